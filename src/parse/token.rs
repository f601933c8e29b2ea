use crate::Integer;
use crate::flatten::Nested;
use crate::num::Num;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, i64, multispace0};
use nom::combinator::{all_consuming, map, map_res, opt, verify};
use nom::error::context;
use nom::number::complete::recognize_float;
use nom::sequence::{delimited, preceded, terminated};
use nom::{IResult, Parser};
use nom_language::error::{VerboseError, convert_error};

pub(in crate::parse) type ParserError<'a> = VerboseError<&'a str>;

type TokenResult<'a, T> = IResult<&'a str, T, ParserError<'a>>;

/// 完整解析单个参数，失败时返回可读的错误信息。
pub(in crate::parse) fn parse_whole<'a, T, P>(parser: P, token: &'a str) -> Result<T, String>
where
    P: Parser<&'a str, Output = T, Error = ParserError<'a>>,
{
    match all_consuming(parser).parse(token) {
        Ok((_, value)) => Ok(value),
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => Err(convert_error(token, err)),
        Err(nom::Err::Incomplete(_)) => Err("incomplete input".to_owned()),
    }
}

/// 范围：`<start>[,[<stop>][,<step>]]`，步长默认为1。
pub(in crate::parse) fn range_spec(input: &str) -> TokenResult<'_, (Integer, Option<Integer>, Integer)> {
    context(
        "RangeSpec",
        map(
            (
                context("RangeSpec::<start>", i64),
                opt(preceded(
                    char(','),
                    (
                        context("RangeSpec::[<stop>]", opt(i64)),
                        opt(preceded(char(','), context("RangeSpec::[<step>]", i64))),
                    ),
                )),
            ),
            |(start, rest)| match rest {
                Some((stop, step)) => (start, stop, step.unwrap_or(1)),
                None => (start, None, 1),
            },
        ),
    )
    .parse(input)
}

/// 上下界：`[<min>],[<max>]`，至少指定其一。
pub(in crate::parse) fn bounds<'a, T, F>(
    bound: F,
) -> impl Parser<&'a str, Output = (Option<T>, Option<T>), Error = ParserError<'a>>
where
    F: Parser<&'a str, Output = T, Error = ParserError<'a>> + Clone,
{
    context(
        "Bounds",
        verify(
            (context("Bounds::[<min>]", opt(bound.clone())), preceded(char(','), context("Bounds::[<max>]", opt(bound)))),
            |(min, max): &(Option<T>, Option<T>)| min.is_some() || max.is_some(),
        ),
    )
}

pub(in crate::parse) fn num(input: &str) -> TokenResult<'_, Num> {
    context("Num", map_res(recognize_float, str::parse::<Num>)).parse(input)
}

/// 嵌套列表字面值，例如`[1,[2,3],4]`，元素两侧的空白被忽略。
///
/// 未闭合的列表保存在显式的栈中，嵌套深度不受调用栈限制。
pub(in crate::parse) fn nested(input: &str) -> TokenResult<'_, Nested<String>> {
    let mut open: Vec<Vec<Nested<String>>> = Vec::new();
    let mut rest = input;
    loop {
        // 读取一个元素：新的列表或单项
        let mut value = match list_open(rest) {
            Ok((after, _)) => match list_close(after) {
                Ok((after, _)) => {
                    rest = after;
                    Nested::List(Vec::new())
                }
                Err(_) => {
                    rest = after;
                    open.push(Vec::new());
                    continue;
                }
            },
            Err(_) => match nested_item(rest) {
                Ok((after, item)) => {
                    rest = after;
                    item
                }
                Err(err) => return Err(release(open, err)),
            },
        };
        // 逐层闭合已结束的列表，直到遇到分隔符或回到最外层
        loop {
            let Some(list) = open.last_mut() else {
                return Ok((rest, value));
            };
            list.push(value);
            if let Ok((after, _)) = list_separator(rest) {
                rest = after;
                break;
            }
            rest = match list_close(rest) {
                Ok((after, _)) => after,
                Err(err) => return Err(release(open, err)),
            };
            value = Nested::List(open.pop().unwrap_or_default());
        }
    }
}

/// 逐层展开并释放未闭合的列表，析构时不产生深层递归。
fn release<E>(open: Vec<Vec<Nested<String>>>, err: E) -> E {
    for list in open {
        Nested::List(list).flatten().for_each(drop);
    }
    err
}

fn list_open(input: &str) -> TokenResult<'_, char> {
    terminated(char('['), multispace0).parse(input)
}

fn list_separator(input: &str) -> TokenResult<'_, char> {
    delimited(multispace0, char(','), multispace0).parse(input)
}

fn list_close(input: &str) -> TokenResult<'_, char> {
    context("Nested::List", preceded(multispace0, char(']'))).parse(input)
}

fn nested_item(input: &str) -> TokenResult<'_, Nested<String>> {
    context(
        "Nested::Item",
        map(
            verify(take_while1(|c: char| !matches!(c, '[' | ']' | ',')), |item: &str| !item.trim().is_empty()),
            |item: &str| Nested::Item(item.trim().to_owned()),
        ),
    )
    .parse(input)
}
