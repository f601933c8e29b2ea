use crate::err::LpErr;
use crate::input::Input;
use crate::op::Op;
use crate::output::Output;
use crate::parse::args::input::parse_input;
use crate::parse::args::op::parse_ops;
use crate::parse::args::output::parse_output;
use std::iter::Peekable;
use std::str::FromStr;

mod condition;
mod config;
mod input;
mod op;
mod output;

pub use config::parse_configs;

pub fn parse(mut args: Peekable<impl Iterator<Item = String>>) -> Result<(Input, Vec<Op>, Output), LpErr> {
    let input = parse_input(&mut args)?;
    let ops = parse_ops(&mut args)?;
    let output = parse_output(&mut args)?;
    let remaining = args.collect::<Vec<_>>();
    if !remaining.is_empty() { Err(LpErr::UnknownArgs { args: remaining }) } else { Ok((input, ops, output)) }
}

fn parse_arg_or_arg1(
    args: &mut Peekable<impl Iterator<Item = String>>, cmd: &'static str, arg: &'static str,
) -> Result<Vec<String>, LpErr> {
    match args.next() {
        // 至少有一个值，直接消耗
        Some(value) => {
            if value == "[" {
                // 多值开始
                let mut values = Vec::new();
                for value in args.by_ref() {
                    if value == "]" {
                        // 多值结束
                        return if values.is_empty() { Err(LpErr::ArgNotEnough { cmd, arg }) } else { Ok(values) };
                    } else {
                        values.push(escaped(value))
                    }
                }
                Err(LpErr::UnclosingMultiArg { cmd, arg })
            } else if value == "]" {
                // 未开启的多值结束
                Err(LpErr::UnexpectedClosingBracket { cmd, arg })
            } else {
                Ok(vec![escaped(value)])
            }
        }
        None => Err(LpErr::MissingArg { cmd, arg }),
    }
}

/// 必选参数。
fn required_arg(
    args: &mut Peekable<impl Iterator<Item = String>>, cmd: &'static str, arg: &'static str,
) -> Result<String, LpErr> {
    args.next().map(escaped).ok_or(LpErr::MissingArg { cmd, arg })
}

/// 必选参数，并按`FromStr`解析。
fn required_arg_as<T>(
    args: &mut Peekable<impl Iterator<Item = String>>, cmd: &'static str, arg: &'static str,
) -> Result<T, LpErr>
where
    T: FromStr,
    T::Err: std::fmt::Debug,
{
    let value = required_arg(args, cmd, arg)?;
    value.parse::<T>().map_err(|err| LpErr::ArgParseErr { cmd, arg, arg_value: value.clone(), error: format!("{err:?}") })
}

/// 必选参数，并按给定的方式解析。
fn required_arg_with<T>(
    args: &mut Peekable<impl Iterator<Item = String>>, cmd: &'static str, arg: &'static str,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<T, LpErr> {
    let value = required_arg(args, cmd, arg)?;
    parse(&value).map_err(|error| LpErr::ArgParseErr { cmd, arg, arg_value: value.clone(), error })
}

/// 可选参数：不是命令（以':'开头），也不是输出（`to`）的下一个参数。
fn optional_arg(args: &mut Peekable<impl Iterator<Item = String>>) -> Option<String> {
    args.next_if(|value| is_plain_arg(value)).map(escaped)
}

fn is_plain_arg(value: &str) -> bool {
    !value.starts_with(':') && !value.eq_ignore_ascii_case("to")
}

/// `\[`、`\]`以及以`\:`开头的参数去除转义符。
fn escaped(arg: String) -> String {
    match arg.strip_prefix('\\') {
        Some(rest) if rest == "[" || rest == "]" || rest.starts_with(':') => rest.to_string(),
        _ => arg,
    }
}

fn consume_if(args: &mut Peekable<impl Iterator<Item = String>>, f: impl FnOnce(&String) -> bool) -> Option<String> {
    args.next_if(f)
}

fn consume_keyword(args: &mut Peekable<impl Iterator<Item = String>>, keyword: &str) -> bool {
    consume_if(args, |value| value.eq_ignore_ascii_case(keyword)).is_some()
}

fn consume_if_some<M, U>(args: &mut Peekable<impl Iterator<Item = String>>, m: M) -> Option<U>
where
    M: FnOnce(&String) -> Option<U>,
{
    let option = m(args.peek()?);
    if option.is_some() {
        args.next();
    }
    option
}

/// 解析`<file>[ append][ lf|crlf]`。
fn parse_general_file_info(args: &mut Peekable<impl Iterator<Item = String>>) -> Option<(String, bool, Option<bool>)> {
    // 必须文件名，直接消耗
    let file = args.next()?;
    let append = consume_keyword(args, "append");
    let crlf = if consume_keyword(args, "crlf") {
        Some(true)
    } else if consume_keyword(args, "lf") {
        Some(false)
    } else {
        None
    };
    Some((escaped(file), append, crlf))
}

#[cfg(test)]
fn build_args(args_line: &'static str) -> Peekable<impl Iterator<Item = String>> {
    args_line.split(' ').filter(|s| !s.is_empty()).map(String::from).peekable()
}
