use crate::err::LpErr;
use crate::pipe::Pipe;
use std::iter::Peekable;

/// 显式的拉取接口：`has_next`向前多拉取至多一个元素并缓存，`get_next`取出下一个元素。
#[derive(Debug)]
pub struct Cursor<T> {
    inner: Peekable<Pipe<T>>,
}

impl<T> Cursor<T> {
    pub fn new(pipe: Pipe<T>) -> Cursor<T> {
        Cursor { inner: pipe.peekable() }
    }

    pub fn has_next(&mut self) -> bool {
        self.inner.peek().is_some()
    }

    pub fn get_next(&mut self) -> Option<T> {
        self.inner.next()
    }

    /// 与`get_next`相同，但将耗尽视为错误。
    pub fn expect_next(&mut self) -> Result<T, LpErr> {
        self.inner.next().ok_or(LpErr::Exhausted)
    }
}

impl<T> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.get_next()
    }
}
