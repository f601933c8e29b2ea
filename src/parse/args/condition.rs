use crate::condition::{Condition, Select};
use crate::err::LpErr;
use crate::parse::args::{consume_if, consume_if_some, required_arg, required_arg_with};
use crate::parse::token::{bounds, num, parse_whole};
use nom::character::complete::usize;
use std::iter::Peekable;

/// 解析条件：`[!]<select>[ <arg>]`。
pub(in crate::parse::args) fn parse_cond(
    args: &mut Peekable<impl Iterator<Item = String>>, cmd: &'static str,
) -> Result<Condition, LpErr> {
    let select = required_arg(args, cmd, "condition")?;
    let (not, select) = match select.strip_prefix('!') {
        Some(select) => (true, select.to_ascii_lowercase()),
        None => (false, select.to_ascii_lowercase()),
    };
    let select = match select.as_str() {
        "even" => Select::Parity { even: true },
        "odd" => Select::Parity { even: false },
        "num" => parse_num(args),
        "len" => parse_len(args, cmd)?,
        "reg" => Select::new_reg(&required_arg(args, cmd, "regex")?)?,
        _ => {
            return Err(LpErr::ArgParseErr {
                cmd,
                arg: "condition",
                arg_value: select,
                error: "unknown condition, see `lp -h cond`".to_string(),
            });
        }
    };
    Ok(Condition::new(select, not))
}

/// `num[ integer|float]`或`num [<min>],[<max>]`
fn parse_num(args: &mut Peekable<impl Iterator<Item = String>>) -> Select {
    if let Some(kind) = consume_if(args, |s| s.eq_ignore_ascii_case("integer") || s.eq_ignore_ascii_case("float")) {
        Select::Num { integer: Some(kind.eq_ignore_ascii_case("integer")) }
    } else if let Some((min, max)) = consume_if_some(args, |s| parse_whole(bounds(num), s).ok()) {
        Select::NumRange { min, max }
    } else {
        Select::Num { integer: None }
    }
}

/// `len <len>`或`len [<min>],[<max>]`
fn parse_len(args: &mut Peekable<impl Iterator<Item = String>>, cmd: &'static str) -> Result<Select, LpErr> {
    required_arg_with(args, cmd, "len", |s| match s.parse::<usize>() {
        Ok(len) => Ok(Select::new_len(len)),
        Err(_) => parse_whole(bounds(usize), s).map(|(min, max)| Select::Len { min, max }),
    })
}
