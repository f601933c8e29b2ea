use crate::{Float, Integer};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

/// 数值：整数或浮点数。
///
/// 整数之间的运算保持整数，溢出或任一侧为浮点数时提升为浮点数。
#[derive(Debug, Clone, Copy)]
pub enum Num {
    Integer(Integer),
    Float(Float),
}

#[derive(Debug, Eq, PartialEq)]
pub struct NotANumber;

impl Num {
    pub fn as_float(self) -> Float {
        match self {
            Num::Integer(i) => i as Float,
            Num::Float(f) => f,
        }
    }

    pub fn square(self) -> Num {
        self * self
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Num::Integer(_))
    }

    pub fn is_even(&self) -> bool {
        match self {
            Num::Integer(i) => i % 2 == 0,
            Num::Float(f) => f.fract() == 0.0 && f % 2.0 == 0.0,
        }
    }
}

impl Default for Num {
    fn default() -> Self {
        Num::Integer(0)
    }
}

impl From<Integer> for Num {
    fn from(value: Integer) -> Self {
        Num::Integer(value)
    }
}

impl From<Float> for Num {
    fn from(value: Float) -> Self {
        Num::Float(value)
    }
}

impl FromStr for Num {
    type Err = NotANumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(i) = s.parse::<Integer>() {
            return Ok(Num::Integer(i));
        }
        match s.parse::<Float>() {
            Ok(f) if f.is_finite() => Ok(Num::Float(f)),
            _ => Err(NotANumber),
        }
    }
}

impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Num::Integer(l), Num::Integer(r)) => l == r,
            (l, r) => l.as_float() == r.as_float(),
        }
    }
}

impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Num::Integer(l), Num::Integer(r)) => l.partial_cmp(r),
            (l, r) => l.as_float().partial_cmp(&r.as_float()),
        }
    }
}

impl Add for Num {
    type Output = Num;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Num::Integer(l), Num::Integer(r)) => l.checked_add(r).map(Num::Integer).unwrap_or_else(|| Num::Float(l as Float + r as Float)),
            (l, r) => Num::Float(l.as_float() + r.as_float()),
        }
    }
}

impl AddAssign for Num {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul for Num {
    type Output = Num;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Num::Integer(l), Num::Integer(r)) => l.checked_mul(r).map(Num::Integer).unwrap_or_else(|| Num::Float(l as Float * r as Float)),
            (l, r) => Num::Float(l.as_float() * r.as_float()),
        }
    }
}

impl Sum for Num {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Num::default(), |acc, n| acc + n)
    }
}

impl Display for Num {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Num::Integer(i) => write!(f, "{i}"),
            // 小数部分为0时按整数显示
            Num::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as Integer),
            Num::Float(v) => write!(f, "{v}"),
        }
    }
}
