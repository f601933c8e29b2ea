use crate::err::LpErr;
use crate::num::Num;
use crate::op::{ArithArg, JoinInfo, Op, PeekArg, SortBy, TakeDropMode};
use crate::parse::args::condition::parse_cond;
use crate::parse::args::input::parse_fmt;
use crate::parse::args::{
    consume_if_some, consume_keyword, is_plain_arg, optional_arg, parse_general_file_info,
    required_arg_as, required_arg_with,
};
use std::iter::Peekable;

pub(in crate::parse::args) fn parse_ops(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Vec<Op>, LpErr> {
    let mut ops = vec![];
    while let Some(op) = parse_op(args)? {
        ops.push(op);
    }
    Ok(ops)
}

fn parse_op(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Option<Op>, LpErr> {
    let Some(cmd) = args.peek() else {
        return Ok(None);
    };
    if !cmd.starts_with(':') {
        return Ok(None);
    }
    let cmd = cmd.to_ascii_lowercase();
    if !Op::cmds().contains(&cmd.as_str()) {
        return Err(LpErr::UnknownCmd { cmd });
    }
    args.next(); // 消耗命令
    let op = match cmd.as_str() {
        ":peek" => parse_peek(args),
        ":square" => Op::Arith(ArithArg::Square),
        ":add" => Op::Arith(ArithArg::Add(required_arg_as::<Num>(args, ":add", "num")?)),
        ":mul" => Op::Arith(ArithArg::Mul(required_arg_as::<Num>(args, ":mul", "num")?)),
        ":limit" => Op::Limit { count: required_arg_as(args, ":limit", "count")? },
        ":skip" => Op::Skip { count: required_arg_as(args, ":skip", "count")? },
        ":take" => parse_take_drop(args, ":take", TakeDropMode::Take, TakeDropMode::TakeWhile)?,
        ":drop" => parse_take_drop(args, ":drop", TakeDropMode::Drop, TakeDropMode::DropWhile)?,
        ":until" => Op::Until { cond: parse_cond(args, ":until")? },
        ":uniq" => Op::Uniq { nocase: consume_keyword(args, "nocase") },
        ":sum" => Op::Sum { fmt: parse_fmt(args) },
        ":acc" => Op::Acc,
        ":count" => Op::Count,
        ":join" => parse_join(args)?,
        ":sort" => parse_sort(args),
        ":csv" => parse_csv(args),
        _ => return Err(LpErr::UnknownCmd { cmd }),
    };
    Ok(Some(op))
}

fn parse_peek(args: &mut Peekable<impl Iterator<Item = String>>) -> Op {
    if args.peek().is_some_and(|file| is_plain_arg(file))
        && let Some((file, append, crlf)) = parse_general_file_info(args)
    {
        Op::Peek(PeekArg::File { file, append, crlf })
    } else {
        Op::Peek(PeekArg::StdOut)
    }
}

fn parse_take_drop(
    args: &mut Peekable<impl Iterator<Item = String>>, cmd: &'static str, mode: TakeDropMode,
    while_mode: TakeDropMode,
) -> Result<Op, LpErr> {
    let mode = if consume_keyword(args, "while") { while_mode } else { mode };
    Ok(Op::new_take_drop(mode, parse_cond(args, cmd)?))
}

fn parse_join(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Op, LpErr> {
    let mut join_info = JoinInfo::default();
    let mut batch = None;
    if let Some(delimiter) = optional_arg(args) {
        join_info.delimiter = delimiter;
        if let Some(prefix) = optional_arg(args) {
            join_info.prefix = prefix;
            if let Some(postfix) = optional_arg(args) {
                join_info.postfix = postfix;
                if args.peek().is_some_and(|batch| is_plain_arg(batch)) {
                    batch = Some(required_arg_with(args, ":join", "batch", |s| match s.parse::<usize>() {
                        Ok(0) => Err("batch must be greater than zero".to_string()),
                        Ok(batch) => Ok(batch),
                        Err(err) => Err(err.to_string()),
                    })?);
                }
            }
        }
    }
    Ok(Op::new_join(join_info, batch))
}

fn parse_sort(args: &mut Peekable<impl Iterator<Item = String>>) -> Op {
    if consume_keyword(args, "random") {
        return Op::new_sort(SortBy::Random, false);
    }
    let sort_by = if consume_keyword(args, "num") {
        SortBy::Num(consume_if_some(args, |s| s.parse::<Num>().ok()))
    } else {
        SortBy::Text(consume_keyword(args, "nocase"))
    };
    Op::new_sort(sort_by, consume_keyword(args, "desc"))
}

fn parse_csv(args: &mut Peekable<impl Iterator<Item = String>>) -> Op {
    let delimiter = if args.peek().is_some_and(|s| !s.eq_ignore_ascii_case("strict")) { optional_arg(args) } else { None };
    Op::new_csv(delimiter, consume_keyword(args, "strict"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Select;
    use crate::parse::args::build_args;

    fn op(args_line: &'static str) -> Result<Option<Op>, LpErr> {
        let mut args = build_args(args_line);
        let op = parse_op(&mut args);
        assert!(args.next().is_none(), "unconsumed args in `{args_line}`");
        op
    }

    fn join_info(delimiter: &str, prefix: &str, postfix: &str) -> JoinInfo {
        JoinInfo { delimiter: delimiter.to_string(), prefix: prefix.to_string(), postfix: postfix.to_string() }
    }

    #[test]
    fn test_non_match() {
        let mut args = build_args("to out");
        assert_eq!(Ok(None), parse_op(&mut args));
        assert_eq!(Some("to".to_string()), args.next());
        assert_eq!(Ok(None), parse_op(&mut build_args("")));
        assert_eq!(Err(LpErr::UnknownCmd { cmd: ":nope".to_string() }), parse_op(&mut build_args(":nope")));
        assert_eq!(Err(LpErr::UnknownCmd { cmd: ":upper".to_string() }), parse_op(&mut build_args(":upper")));
    }

    #[test]
    fn test_parse_ops() {
        let mut args = build_args(":square :limit 3 to out");
        assert_eq!(Ok(vec![Op::Arith(ArithArg::Square), Op::Limit { count: 3 }]), parse_ops(&mut args));
        assert_eq!(Some("to".to_string()), args.next());
    }

    #[test]
    fn test_parse_peek() {
        assert_eq!(op(":peek"), Ok(Some(Op::Peek(PeekArg::StdOut))));
        assert_eq!(
            op(":peek f.txt append crlf"),
            Ok(Some(Op::Peek(PeekArg::File { file: "f.txt".to_string(), append: true, crlf: Some(true) })))
        );
        let mut args = build_args(":peek to out");
        assert_eq!(parse_op(&mut args), Ok(Some(Op::Peek(PeekArg::StdOut))));
        assert_eq!(Some("to".to_string()), args.next());
    }

    #[test]
    fn test_parse_arith() {
        assert_eq!(op(":square"), Ok(Some(Op::Arith(ArithArg::Square))));
        assert_eq!(op(":add -2"), Ok(Some(Op::Arith(ArithArg::Add(Num::from(-2))))));
        assert_eq!(op(":mul 0.5"), Ok(Some(Op::Arith(ArithArg::Mul(Num::from(0.5))))));
        assert!(matches!(op(":add x"), Err(LpErr::ArgParseErr { cmd: ":add", .. })));
        assert_eq!(op(":mul"), Err(LpErr::MissingArg { cmd: ":mul", arg: "num" }));
    }

    #[test]
    fn test_parse_limit_skip() {
        assert_eq!(op(":limit 10"), Ok(Some(Op::Limit { count: 10 })));
        assert_eq!(op(":skip 0"), Ok(Some(Op::Skip { count: 0 })));
        assert!(matches!(op(":limit -1"), Err(LpErr::ArgParseErr { cmd: ":limit", .. })));
    }

    #[test]
    fn test_parse_take_drop_until() {
        assert_eq!(
            op(":take even"),
            Ok(Some(Op::new_take_drop(TakeDropMode::Take, Select::Parity { even: true }.yes())))
        );
        assert_eq!(
            op(":drop while !num"),
            Ok(Some(Op::new_take_drop(TakeDropMode::DropWhile, Select::Num { integer: None }.no())))
        );
        assert_eq!(
            op(":take while len 3"),
            Ok(Some(Op::new_take_drop(TakeDropMode::TakeWhile, Select::new_len(3).yes())))
        );
        assert_eq!(
            op(":until num 100,"),
            Ok(Some(Op::Until { cond: Select::NumRange { min: Some(Num::from(100)), max: None }.yes() }))
        );
        assert_eq!(op(":take"), Err(LpErr::MissingArg { cmd: ":take", arg: "condition" }));
    }

    #[test]
    fn test_parse_uniq() {
        assert_eq!(op(":uniq"), Ok(Some(Op::Uniq { nocase: false })));
        assert_eq!(op(":uniq nocase"), Ok(Some(Op::Uniq { nocase: true })));
    }

    #[test]
    fn test_parse_sum_acc_count() {
        assert_eq!(op(":sum"), Ok(Some(Op::Sum { fmt: None })));
        assert_eq!(op(":sum total={v}"), Ok(Some(Op::Sum { fmt: Some("total={v}".to_string()) })));
        assert_eq!(op(":acc"), Ok(Some(Op::Acc)));
        assert_eq!(op(":count"), Ok(Some(Op::Count)));
    }

    #[test]
    fn test_parse_join() {
        assert_eq!(op(":join"), Ok(Some(Op::new_join(JoinInfo::default(), None))));
        assert_eq!(op(":join ,"), Ok(Some(Op::new_join(join_info(",", "", ""), None))));
        assert_eq!(op(":join , \\[ \\]"), Ok(Some(Op::new_join(join_info(",", "[", "]"), None))));
        assert_eq!(op(":join , < > 3"), Ok(Some(Op::new_join(join_info(",", "<", ">"), Some(3)))));
        assert!(matches!(op(":join , < > 0"), Err(LpErr::ArgParseErr { cmd: ":join", arg: "batch", .. })));
        assert!(matches!(op(":join , < > x"), Err(LpErr::ArgParseErr { cmd: ":join", arg: "batch", .. })));
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(op(":sort"), Ok(Some(Op::new_sort(SortBy::Text(false), false))));
        assert_eq!(op(":sort nocase desc"), Ok(Some(Op::new_sort(SortBy::Text(true), true))));
        assert_eq!(op(":sort num"), Ok(Some(Op::new_sort(SortBy::Num(None), false))));
        assert_eq!(op(":sort num 1.5 desc"), Ok(Some(Op::new_sort(SortBy::Num(Some(Num::from(1.5))), true))));
        assert_eq!(op(":sort random"), Ok(Some(Op::new_sort(SortBy::Random, false))));
    }

    #[test]
    fn test_parse_csv() {
        assert_eq!(op(":csv"), Ok(Some(Op::new_csv(None, false))));
        assert_eq!(op(":csv ;"), Ok(Some(Op::new_csv(Some(";".to_string()), false))));
        assert_eq!(op(":csv strict"), Ok(Some(Op::new_csv(None, true))));
        assert_eq!(op(":csv | strict"), Ok(Some(Op::new_csv(Some("|".to_string()), true))));
    }
}
