use crate::err::LpErr;
use std::ops::AddAssign;

/// 累加器：在"产出当前总和"与"并入新值"之间交替的两态对象。
///
/// 首次`produce`之前总和尚未初始化，此时`accept`返回错误。
#[derive(Debug, Clone, Default)]
pub struct Accumulator<T> {
    total: Option<T>,
}

impl<T: Default + AddAssign + Clone> Accumulator<T> {
    pub fn new() -> Accumulator<T> {
        Accumulator { total: None }
    }

    /// 产出当前总和，首次调用时以`T::default()`作为初始值。
    pub fn produce(&mut self) -> T {
        self.total.get_or_insert_with(T::default).clone()
    }

    pub fn accept(&mut self, value: T) -> Result<(), LpErr> {
        match &mut self.total {
            Some(total) => {
                *total += value;
                Ok(())
            }
            None => Err(LpErr::AccumulatorNotStarted),
        }
    }

    /// 并入一个值并产出新的总和。
    pub fn send(&mut self, value: T) -> Result<T, LpErr> {
        self.accept(value)?;
        Ok(self.produce())
    }

    pub fn is_started(&self) -> bool {
        self.total.is_some()
    }
}
