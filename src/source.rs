use crate::Integer;
use crate::err::LpErr;
use crate::pipe::Pipe;
use std::iter::{repeat_n, successors};

/// 1到`max`（包含）的整数。
pub fn count_up_to(max: Integer) -> Pipe<Integer> {
    Pipe::new(1..=max)
}

/// 斐波那契数列：0, 1, 1, 2, 3, 5, ...
///
/// 理论上无限，下一个值超出`u128`范围时结束。
pub fn fibonacci() -> Pipe<u128> {
    Pipe::new(Fibonacci { current: Some(0), next: Some(1) })
}

/// 从`start`开始逐个翻倍：start, 2*start, 4*start, ...，溢出时结束。
pub fn doubling(start: Integer) -> Pipe<Integer> {
    Pipe::new(successors(Some(start), |n| n.checked_mul(2)))
}

pub fn of<T: 'static>(values: Vec<T>) -> Pipe<T> {
    Pipe::new(values.into_iter())
}

/// 重复`value`，未指定`count`时无限重复。
pub fn repeat<T: Clone + 'static>(value: T, count: Option<usize>) -> Pipe<T> {
    match count {
        Some(count) => Pipe::new(repeat_n(value, count)),
        None => Pipe::new(std::iter::repeat(value)),
    }
}

#[derive(Debug)]
struct Fibonacci {
    current: Option<u128>,
    next: Option<u128>,
}

impl Iterator for Fibonacci {
    type Item = u128;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.current?;
        self.current = self.next;
        self.next = self.next.and_then(|next| next.checked_add(value));
        Some(value)
    }
}

/// 整数范围：包含起始值，不包含结束值。
///
/// 步长为正时递增直到不小于结束值，步长为负时递减直到不大于结束值；
/// 没有结束值时无限生成，直到溢出。
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RangeIter {
    next: Option<Integer>,
    stop: Option<Integer>,
    step: Integer,
}

impl RangeIter {
    pub fn new(start: Integer, stop: Option<Integer>, step: Integer) -> Result<RangeIter, LpErr> {
        if step == 0 { Err(LpErr::ZeroStep) } else { Ok(RangeIter { next: Some(start), stop, step }) }
    }

    /// 0到`stop`（不包含），步长为1。
    pub fn up_to(stop: Integer) -> RangeIter {
        RangeIter { next: Some(0), stop: Some(stop), step: 1 }
    }

    pub fn into_pipe(self) -> Pipe<Integer> {
        Pipe::new(self)
    }
}

impl Iterator for RangeIter {
    type Item = Integer;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let in_range = match self.stop {
            Some(stop) => {
                if self.step > 0 {
                    current < stop
                } else {
                    current > stop
                }
            }
            None => true,
        };
        if in_range {
            self.next = current.checked_add(self.step);
            Some(current)
        } else {
            self.next = None;
            None
        }
    }
}
