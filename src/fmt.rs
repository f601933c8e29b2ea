use crate::err::LpErr;
use crate::num::Num;
use crate::{Float, Integer};
use rt_format::{Format, FormatArgument, NoPositionalArguments, ParsedFormat, Specifier};
use std::collections::HashMap;
use std::fmt;

/// 运行时格式化参数。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FmtArg {
    Integer(Integer),
    Unsigned(u128),
    Float(Float),
}

impl From<Integer> for FmtArg {
    fn from(value: Integer) -> Self {
        FmtArg::Integer(value)
    }
}

impl From<u128> for FmtArg {
    fn from(value: u128) -> Self {
        FmtArg::Unsigned(value)
    }
}

impl From<Num> for FmtArg {
    fn from(value: Num) -> Self {
        match value {
            Num::Integer(i) => FmtArg::Integer(i),
            Num::Float(f) => FmtArg::Float(f),
        }
    }
}

macro_rules! fmt_integer_only {
    ($name:ident, $trait:path) => {
        fn $name(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                FmtArg::Integer(v) => <Integer as $trait>::fmt(v, f),
                FmtArg::Unsigned(v) => <u128 as $trait>::fmt(v, f),
                // 浮点数不支持该格式时按Display输出
                FmtArg::Float(v) => <Float as fmt::Display>::fmt(v, f),
            }
        }
    };
}

macro_rules! fmt_any {
    ($name:ident, $trait:path) => {
        fn $name(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                FmtArg::Integer(v) => <Integer as $trait>::fmt(v, f),
                FmtArg::Unsigned(v) => <u128 as $trait>::fmt(v, f),
                FmtArg::Float(v) => <Float as $trait>::fmt(v, f),
            }
        }
    };
}

impl FormatArgument for FmtArg {
    fn supports_format(&self, specifier: &Specifier) -> bool {
        match self {
            FmtArg::Integer(_) | FmtArg::Unsigned(_) => true,
            FmtArg::Float(_) => {
                matches!(specifier.format, Format::Display | Format::Debug | Format::LowerExp | Format::UpperExp)
            }
        }
    }

    fmt_any!(fmt_display, fmt::Display);
    fmt_any!(fmt_debug, fmt::Debug);
    fmt_integer_only!(fmt_octal, fmt::Octal);
    fmt_integer_only!(fmt_lower_hex, fmt::LowerHex);
    fmt_integer_only!(fmt_upper_hex, fmt::UpperHex);
    fmt_integer_only!(fmt_binary, fmt::Binary);
    fmt_any!(fmt_lower_exp, fmt::LowerExp);
    fmt_any!(fmt_upper_exp, fmt::UpperExp);

    fn to_usize(&self) -> Result<usize, ()> {
        match self {
            FmtArg::Integer(v) => usize::try_from(*v).map_err(|_| ()),
            FmtArg::Unsigned(v) => usize::try_from(*v).map_err(|_| ()),
            FmtArg::Float(_) => Err(()),
        }
    }
}

/// 按照Rust格式化语法格式化，参数以名称引用，例如`{v:#04x}`。
pub fn fmt_args(fmt: &str, args: &[(&str, FmtArg)]) -> Result<String, LpErr> {
    let named = args.iter().copied().collect::<HashMap<&str, FmtArg>>();
    ParsedFormat::parse(fmt, &NoPositionalArguments, &named)
        .map(|parsed| parsed.to_string())
        .map_err(|pos| LpErr::FormatErr { fmt: fmt.to_owned(), err: format!("invalid or unsupported specifier at {pos:?}") })
}

/// 校验格式化字符串对给定参数是否可用，在流水线运行前尽早报错。
pub fn check_fmt(fmt: &str, sample: FmtArg) -> Result<(), LpErr> {
    fmt_args(fmt, &[("v", sample)]).map(|_| ())
}
