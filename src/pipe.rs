use crate::accumulator::Accumulator;
use crate::cursor::Cursor;
use crate::stage::Stage;
use rustc_hash::FxHashSet;
use std::fmt::{Debug, Formatter};
use std::hash::Hash;
use std::iter::FusedIterator;
use std::ops::AddAssign;

/// 惰性序列。
///
/// 每次拉取才计算下一个元素，可以有限也可以无限。一旦返回`None`（耗尽），
/// 后续的每次拉取都返回`None`。
pub struct Pipe<T> {
    iter: Box<dyn Iterator<Item = T>>,
}

impl<T> Iterator for Pipe<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> FusedIterator for Pipe<T> {}

impl<T> Debug for Pipe<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipe").finish_non_exhaustive()
    }
}

impl<T: 'static> Pipe<T> {
    pub fn new(iter: impl Iterator<Item = T> + 'static) -> Pipe<T> {
        Pipe { iter: Box::new(iter.fuse()) }
    }

    pub fn empty() -> Pipe<T> {
        Pipe::new(std::iter::empty())
    }

    pub fn op_map<U: 'static>(self, f: impl FnMut(T) -> U + 'static) -> Pipe<U> {
        Pipe::new(self.map(f))
    }

    pub fn op_filter(self, f: impl FnMut(&T) -> bool + 'static) -> Pipe<T> {
        Pipe::new(self.filter(f))
    }

    pub fn op_inspect(self, f: impl FnMut(&T) + 'static) -> Pipe<T> {
        Pipe::new(self.inspect(f))
    }

    pub fn then(self, stage: Stage<T>) -> Pipe<T> {
        stage(self)
    }

    /// 只保留前`count`个元素，用于限定无限序列。
    pub fn bounded(self, count: usize) -> Pipe<T> {
        Pipe::new(self.take(count))
    }

    /// 保留首个满足`sentinel`的元素之前的所有元素，哨兵本身被丢弃。
    pub fn until(self, mut sentinel: impl FnMut(&T) -> bool + 'static) -> Pipe<T> {
        Pipe::new(self.take_while(move |item| !sentinel(item)))
    }

    /// 按`key`去重，只保留每个键首次出现的元素。
    ///
    /// 已见过的键会一直保留，无限序列上的内存占用随不同键的数量增长。
    pub fn distinct_by<K: Hash + Eq + 'static>(self, mut key: impl FnMut(&T) -> K + 'static) -> Pipe<T> {
        let mut seen = FxHashSet::default();
        self.op_filter(move |item| seen.insert(key(item)))
    }

    /// 拉取全部元素。对无限序列调用前必须先限定。
    pub fn drain(self) -> Vec<T> {
        self.collect()
    }

    pub fn cursor(self) -> Cursor<T> {
        Cursor::new(self)
    }

    /// 依次连接多个序列。
    pub fn chain_all<I>(pipes: I) -> Pipe<T>
    where
        I: IntoIterator<Item = Pipe<T>>,
        I::IntoIter: 'static,
    {
        Pipe::new(pipes.into_iter().flatten())
    }

    /// 将序列转为累加值序列，每个输出为截至当前元素的总和。
    pub fn running_total(self) -> Pipe<T>
    where
        T: Default + AddAssign + Clone,
    {
        let mut acc = Accumulator::new();
        acc.produce();
        self.op_map(move |item| acc.send(item).unwrap_or_else(|_| unreachable!("accumulator is started")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{count_up_to, fibonacci};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_distinct_by() {
        let pipe = Pipe::new(vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3].into_iter()).distinct_by(|n| *n);
        assert_eq!(pipe.drain(), vec![3, 1, 4, 5, 9, 2, 6]);
        let by_parity = Pipe::new(1..).distinct_by(|n| n % 2).bounded(2);
        assert_eq!(by_parity.drain(), vec![1, 2]);
    }

    #[test]
    fn test_even_squares() {
        let pipe = Pipe::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10].into_iter()).op_filter(|n| n % 2 == 0).op_map(|n| n * n);
        assert_eq!(pipe.drain(), vec![4, 16, 36, 64, 100]);
    }

    #[test]
    fn test_pull_on_demand() {
        let pulled = Rc::new(Cell::new(0));
        let counter = pulled.clone();
        let mut pipe = Pipe::new(1..).op_inspect(move |_| counter.set(counter.get() + 1)).op_filter(|n| n % 3 == 0);
        assert_eq!(pulled.get(), 0);
        assert_eq!(pipe.next(), Some(3));
        assert_eq!(pulled.get(), 3);
        assert_eq!(pipe.bounded(2).drain(), vec![6, 9]);
        assert_eq!(pulled.get(), 9);
    }

    #[test]
    fn test_fused_after_exhaustion() {
        let mut flip = false;
        // 交替返回None/Some的非融合迭代器
        let raw = std::iter::from_fn(move || {
            flip = !flip;
            if flip { None } else { Some(1) }
        });
        let mut pipe = Pipe::new(raw);
        assert_eq!(pipe.next(), None);
        assert_eq!(pipe.next(), None);
        assert_eq!(pipe.next(), None);
    }

    #[test]
    fn test_exhaustion_propagates_through_stages() {
        let mut pipe = count_up_to(2).op_map(|n| n * 10).op_filter(|_| true);
        assert_eq!(pipe.next(), Some(10));
        assert_eq!(pipe.next(), Some(20));
        assert_eq!(pipe.next(), None);
        assert_eq!(pipe.next(), None);
    }

    #[test]
    fn test_until() {
        assert_eq!(fibonacci().until(|n| *n > 50).drain(), vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
        assert_eq!(count_up_to(3).until(|_| false).drain(), vec![1, 2, 3]);
        assert!(count_up_to(3).until(|_| true).drain().is_empty());
    }

    #[test]
    fn test_chain_all() {
        let pipe = Pipe::chain_all(vec![
            Pipe::new(vec!["1", "2"].into_iter()),
            Pipe::new("ab".split("")).op_filter(|s| !s.is_empty()),
            Pipe::new(vec!["3", "4"].into_iter()),
        ]);
        assert_eq!(pipe.drain(), vec!["1", "2", "a", "b", "3", "4"]);
    }

    #[test]
    fn test_running_total() {
        assert_eq!(Pipe::new(vec![10.0, 20.0, 5.0].into_iter()).running_total().drain(), vec![10.0, 30.0, 35.0]);
        assert!(Pipe::<i64>::empty().running_total().drain().is_empty());
    }

    #[test]
    fn test_incremental_equals_eager() {
        let build = || count_up_to(20).op_filter(|n| n % 2 == 1).op_map(|n| n * 3);
        let mut incremental = Vec::new();
        let mut pipe = build();
        while let Some(item) = pipe.next() {
            incremental.push(item);
        }
        assert_eq!(incremental, build().drain());
    }
}
