use crate::pipe::Pipe;
use std::fmt::{Display, Formatter};

/// 嵌套序列：单个元素，或由嵌套序列组成的列表。
#[derive(Debug, Clone, PartialEq)]
pub enum Nested<T> {
    Item(T),
    List(Vec<Nested<T>>),
}

impl<T: 'static> Nested<T> {
    /// 按深度优先、从左到右的顺序惰性展开全部元素。
    pub fn flatten(self) -> Pipe<T> {
        Pipe::new(Flatten::new(self))
    }
}

impl<T: Display> Display for Nested<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Nested::Item(item) => write!(f, "{item}"),
            Nested::List(list) => {
                write!(f, "[")?;
                for (idx, nested) in list.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{nested}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// 展开迭代器，每层列表对应栈中的一个迭代器，不依赖递归调用。
#[derive(Debug)]
pub struct Flatten<T> {
    stack: Vec<std::vec::IntoIter<Nested<T>>>,
}

impl<T> Flatten<T> {
    pub fn new(root: Nested<T>) -> Flatten<T> {
        Flatten { stack: vec![vec![root].into_iter()] }
    }
}

impl<T> Iterator for Flatten<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(Nested::Item(item)) => return Some(item),
                Some(Nested::List(list)) => self.stack.push(list.into_iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Nested::{Item, List};

    fn sample() -> Nested<i32> {
        // [1, [2, 3, [4, 5]], 6, [7, [8, 9]]]
        List(vec![
            Item(1),
            List(vec![Item(2), Item(3), List(vec![Item(4), Item(5)])]),
            Item(6),
            List(vec![Item(7), List(vec![Item(8), Item(9)])]),
        ])
    }

    #[test]
    fn test_flatten() {
        assert_eq!(sample().flatten().drain(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_flatten_edge() {
        assert_eq!(Item(1).flatten().drain(), vec![1]);
        assert!(List::<i32>(vec![]).flatten().drain().is_empty());
        assert_eq!(List(vec![List(vec![]), List(vec![List(vec![Item(1)])]), List(vec![])]).flatten().drain(), vec![1]);
    }

    #[test]
    fn test_flatten_deep() {
        let mut nested = Item(0);
        for _ in 0..10_000 {
            nested = List(vec![nested]);
        }
        let mut flatten = Flatten::new(nested);
        assert_eq!(flatten.next(), Some(0));
        assert_eq!(flatten.next(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "[1, [2, 3, [4, 5]], 6, [7, [8, 9]]]");
    }
}
