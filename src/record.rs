use crate::err::LpErr;
use crate::pipe::Pipe;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// 数据行字段数与表头不一致时的处理方式。
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum FieldPolicy {
    /// 按位置配对，以较短的一方为准，多余的表头或字段被忽略。
    #[default]
    Zip,
    /// 字段数不一致时产出`LpErr::FieldCountMismatch`。
    Strict,
}

/// 一条记录：共享同一表头的有序`(字段名, 值)`列表。
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Record {
    header: Rc<[String]>,
    values: Vec<String>,
}

impl Record {
    pub fn len(&self) -> usize {
        self.header.len().min(self.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按字段名取值，字段名重复时取最后一个。
    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter().filter(|(field, _)| *field == name).last().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header.iter().zip(self.values.iter()).map(|(field, value)| (field.as_str(), value.as_str()))
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (idx, (field, value)) in self.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}: {value}")?;
        }
        write!(f, "}}")
    }
}

/// 首行作为表头，后续每行按分隔符拆分后与表头按位置配对。
#[derive(Debug)]
pub struct Records<I> {
    lines: I,
    delimiter: String,
    policy: FieldPolicy,
    header: Option<Rc<[String]>>,
    line_no: usize,
}

impl<I: Iterator<Item = String>> Records<I> {
    pub fn new(lines: I, delimiter: impl Into<String>, policy: FieldPolicy) -> Records<I> {
        Records { lines, delimiter: delimiter.into(), policy, header: None, line_no: 0 }
    }

    fn split(&self, line: &str) -> Vec<String> {
        line.split(self.delimiter.as_str()).map(str::to_owned).collect()
    }
}

impl<I: Iterator<Item = String>> Iterator for Records<I> {
    type Item = Result<Record, LpErr>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = match &self.header {
            Some(header) => header.clone(),
            None => {
                // 没有表头行则没有任何记录
                let first = self.lines.next()?;
                self.line_no += 1;
                let header: Rc<[String]> = self.split(&first).into();
                self.header = Some(header.clone());
                header
            }
        };
        let line = self.lines.next()?;
        self.line_no += 1;
        let values = self.split(&line);
        if self.policy == FieldPolicy::Strict && values.len() != header.len() {
            return Some(Err(LpErr::FieldCountMismatch {
                line_no: self.line_no,
                expected: header.len(),
                actual: values.len(),
            }));
        }
        Some(Ok(Record { header, values }))
    }
}

pub fn records(lines: Pipe<String>, delimiter: impl Into<String>, policy: FieldPolicy) -> Pipe<Result<Record, LpErr>> {
    Pipe::new(Records::new(lines, delimiter, policy))
}
