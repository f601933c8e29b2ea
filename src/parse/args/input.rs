use crate::Integer;
use crate::err::LpErr;
use crate::input::Input;
use crate::parse::args::{
    consume_if, consume_if_some, parse_arg_or_arg1, required_arg, required_arg_as, required_arg_with,
};
use crate::parse::token::{nested, parse_whole, range_spec};
use std::iter::Peekable;

pub(in crate::parse::args) fn parse_input(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Input, LpErr> {
    let Some(cmd) = args.peek() else {
        return Ok(Input::new_std_in());
    };
    // 未指定输入时默认从标准输入读取
    let input = match cmd.to_ascii_lowercase().as_str() {
        ":in" => {
            args.next();
            Input::new_std_in()
        }
        ":file" => {
            args.next();
            Input::new_file(parse_arg_or_arg1(args, ":file", "file")?)
        }
        ":of" => {
            args.next();
            Input::new_of(parse_arg_or_arg1(args, ":of", "text")?)
        }
        ":gen" => parse_gen(args)?,
        ":fib" => {
            args.next();
            Input::new_fib(parse_fmt(args))
        }
        ":double" => {
            args.next();
            Input::new_double(required_arg_as::<Integer>(args, ":double", "start")?)
        }
        ":repeat" => {
            args.next();
            let value = required_arg(args, ":repeat", "value")?;
            let count = consume_if_some(args, |s| s.parse::<usize>().ok());
            Input::new_repeat(value, count)
        }
        ":nested" => {
            args.next();
            Input::new_nested(required_arg_with(args, ":nested", "literal", |s| parse_whole(nested, s))?)
        }
        _ => Input::new_std_in(),
    };
    Ok(input)
}

fn parse_gen(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Input, LpErr> {
    args.next();
    let (start, stop, step) = required_arg_with(args, ":gen", "range", |s| parse_whole(range_spec, s))?;
    if step == 0 {
        return Err(LpErr::ZeroStep);
    }
    Ok(Input::new_gen(start, stop, step, parse_fmt(args)))
}

/// 可选的格式化字符串，只接受包含`{`的参数。
pub(in crate::parse::args) fn parse_fmt(args: &mut Peekable<impl Iterator<Item = String>>) -> Option<String> {
    consume_if(args, |s| s.contains('{'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::Nested;
    use crate::parse::args::build_args;

    fn item(value: &str) -> Nested<String> {
        Nested::Item(value.to_string())
    }

    #[test]
    fn test_non_match() {
        let mut args = build_args(":square");
        assert_eq!(Ok(Input::new_std_in()), parse_input(&mut args));
        assert_eq!(Some(":square".to_string()), args.next());
        assert_eq!(Ok(Input::new_std_in()), parse_input(&mut build_args("")));
    }

    #[test]
    fn test_parse_std_in() {
        let mut args = build_args(":in :square");
        assert_eq!(Ok(Input::new_std_in()), parse_input(&mut args));
        assert_eq!(Some(":square".to_string()), args.next());
        assert_eq!(Ok(Input::new_std_in()), parse_input(&mut build_args(":IN")));
    }

    #[test]
    fn test_parse_file() {
        let mut args = build_args(":file f.txt");
        assert_eq!(Ok(Input::new_file(vec!["f.txt".to_string()])), parse_input(&mut args));
        assert!(args.next().is_none());

        let mut args = build_args(":file [ a.txt b.txt ] :square");
        assert_eq!(Ok(Input::new_file(vec!["a.txt".to_string(), "b.txt".to_string()])), parse_input(&mut args));
        assert_eq!(Some(":square".to_string()), args.next());

        assert_eq!(Err(LpErr::MissingArg { cmd: ":file", arg: "file" }), parse_input(&mut build_args(":file")));
    }

    #[test]
    fn test_parse_of() {
        let mut args = build_args(":of [ a \\:b ]");
        assert_eq!(Ok(Input::new_of(vec!["a".to_string(), ":b".to_string()])), parse_input(&mut args));
        assert!(args.next().is_none());
    }

    #[test]
    fn test_parse_gen() {
        assert_eq!(Ok(Input::new_gen(0, None, 1, None)), parse_input(&mut build_args(":gen 0")));
        assert_eq!(Ok(Input::new_gen(0, Some(10), 2, None)), parse_input(&mut build_args(":gen 0,10,2")));
        assert_eq!(Ok(Input::new_gen(0, None, 2, None)), parse_input(&mut build_args(":gen 0,,2")));
        assert_eq!(
            Ok(Input::new_gen(0, Some(10), 1, Some("n{v}".to_string()))),
            parse_input(&mut build_args(":gen 0,10 n{v}"))
        );
        let mut args = build_args(":gen 0,10 :square");
        assert_eq!(Ok(Input::new_gen(0, Some(10), 1, None)), parse_input(&mut args));
        assert_eq!(Some(":square".to_string()), args.next());

        assert_eq!(Err(LpErr::ZeroStep), parse_input(&mut build_args(":gen 0,10,0")));
        assert!(matches!(parse_input(&mut build_args(":gen a")), Err(LpErr::ArgParseErr { cmd: ":gen", .. })));
        assert_eq!(Err(LpErr::MissingArg { cmd: ":gen", arg: "range" }), parse_input(&mut build_args(":gen")));
    }

    #[test]
    fn test_parse_fib_double() {
        assert_eq!(Ok(Input::new_fib(None)), parse_input(&mut build_args(":fib")));
        assert_eq!(Ok(Input::new_fib(Some("{v:>4}".to_string()))), parse_input(&mut build_args(":fib {v:>4}")));
        assert_eq!(Ok(Input::new_double(3)), parse_input(&mut build_args(":double 3")));
        assert!(matches!(parse_input(&mut build_args(":double x")), Err(LpErr::ArgParseErr { cmd: ":double", .. })));
    }

    #[test]
    fn test_parse_repeat() {
        assert_eq!(Ok(Input::new_repeat("x".to_string(), None)), parse_input(&mut build_args(":repeat x")));
        assert_eq!(Ok(Input::new_repeat("x".to_string(), Some(3))), parse_input(&mut build_args(":repeat x 3")));
        let mut args = build_args(":repeat x :limit 3");
        assert_eq!(Ok(Input::new_repeat("x".to_string(), None)), parse_input(&mut args));
        assert_eq!(Some(":limit".to_string()), args.next());
    }

    #[test]
    fn test_parse_nested() {
        assert_eq!(
            Ok(Input::new_nested(Nested::List(vec![item("1"), Nested::List(vec![item("2"), item("3")])]))),
            parse_input(&mut build_args(":nested [1,[2,3]]"))
        );
        assert!(matches!(parse_input(&mut build_args(":nested [1,[2")), Err(LpErr::ArgParseErr { cmd: ":nested", .. })));
    }
}
