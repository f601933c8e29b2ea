use crate::err::LpErr;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use tracing::debug;

/// 将文本资源转为去除首尾空白的行序列。
///
/// 资源由`TextLines`独占持有，无论序列是耗尽、提前放弃还是出错，
/// 在`TextLines`被丢弃时资源都会随之释放。
#[derive(Debug)]
pub struct TextLines<R> {
    name: String,
    reader: R,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> TextLines<R> {
    pub fn new(name: impl Into<String>, reader: R) -> TextLines<R> {
        TextLines { name: name.into(), reader, line_no: 0, done: false }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TextLines<BufReader<File>> {
    pub fn open(file: &str) -> Result<TextLines<BufReader<File>>, LpErr> {
        let fin = File::open(file).map_err(|err| LpErr::OpenFileErr { file: file.to_owned(), err: err.to_string() })?;
        debug!(file, "opened line source");
        Ok(TextLines::new(file, BufReader::new(fin)))
    }
}

impl<R: BufRead> Iterator for TextLines<R> {
    type Item = Result<String, LpErr>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut buf = String::new();
        match self.reader.read_line(&mut buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_no += 1;
                Some(Ok(buf.trim().to_owned()))
            }
            Err(err) => {
                self.line_no += 1;
                // 非UTF-8内容已被消费，可以继续读取后续行；其他IO错误后不再读取
                if err.kind() != ErrorKind::InvalidData {
                    self.done = true;
                }
                Some(Err(LpErr::ReadFromFileErr { file: self.name.clone(), line_no: self.line_no, err: err.to_string() }))
            }
        }
    }
}

impl<R> Drop for TextLines<R> {
    fn drop(&mut self) {
        debug!(source = %self.name, lines = self.line_no, "released line source");
    }
}
