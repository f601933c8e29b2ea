use crate::Integer;
use crate::config::Config;
use crate::err::LpErr;
use crate::flatten::Nested;
use crate::fmt::{FmtArg, check_fmt, fmt_args};
use crate::lines::TextLines;
use crate::pipe::Pipe;
use crate::source::{RangeIter, doubling, fibonacci, of, repeat};
use cmd_help::CmdHelp;
use std::io;
use tracing::debug;

#[derive(Debug, PartialEq, CmdHelp)]
pub enum Input {
    /// :in         从标准输入读取输入，每行去除首尾空白后作为一个数据。
    ///             未指定输入时的默认输入。
    StdIn,
    /// :file       从文件读取输入，每行去除首尾空白后作为一个数据。
    ///             :file <file>|[ <file>[ <file>][...] ]
    ///                 <file>  文件路径，至少指定一个，多个文件按顺序依次读取。
    ///             例如：
    ///                 :file input.txt
    ///                 :file [ input1.txt input2.txt input3.txt ]
    File { files: Vec<String> },
    /// :of         使用直接字面值作为输入。
    ///             :of <text>|[ <text>[ <text>][...] ]
    ///                 <text>  字面值，至少指定一个，如果以':'开头，需要使用'\:'转义。
    ///             例如：
    ///                 :of line
    ///                 :of [ line1 "line 2" 'line 3' ]
    Of { values: Vec<String> },
    /// :gen        生成指定范围内的整数作为输入，支持进一步格式化。
    ///             :gen <start>[,[<stop>][,<step>]][ <fmt>]
    ///                 <start> 起始值，包含，必选。
    ///                 <stop>  结束值，不包含，可选，未指定时持续生成直到溢出。
    ///                 <step>  步长，不能为0，可选，未指定时取步长为1。
    ///                         步长为正值时递增生成，为负值时递减生成。
    ///                 <fmt>   格式化字符串，以{v}表示生成的整数值，参考`-h fmt`。
    ///             例如：
    ///                 :gen 0          生成：0 1 2 3 4 5 ...
    ///                 :gen 0,10       生成：0 1 2 3 4 5 6 7 8 9
    ///                 :gen 0,10,2     生成：0 2 4 6 8
    ///                 :gen 0,,2       生成：0 2 4 6 8 10 12 14 ...
    ///                 :gen 10,0       无数据生成
    ///                 :gen 10,0,-2    生成：10 8 6 4 2
    ///                 :gen 0,3 n{v}   生成：n0 n1 n2
    Gen { start: Integer, stop: Option<Integer>, step: Integer, fmt: Option<String> },
    /// :fib        生成斐波那契数列：0 1 1 2 3 5 8 ...，超出128位无符号整数范围时结束。
    ///             :fib[ <fmt>]
    ///                 <fmt>   格式化字符串，以{v}表示生成的值，参考`-h fmt`。
    Fib { fmt: Option<String> },
    /// :double     从给定整数开始逐个翻倍，溢出时结束。
    ///             :double <start>
    ///             例如：
    ///                 :double 1       生成：1 2 4 8 16 ...
    Double { start: Integer },
    /// :repeat     重复字面值作为输入。
    ///             :repeat <value>[ <count>]
    ///                 <value> 需要重复的字面值，必选。
    ///                 <count> 需要重复的次数，必须为非负数，可选，未指定时无限重复。
    Repeat { value: String, count: Option<usize> },
    /// :nested     展开嵌套列表字面值，按深度优先、从左到右的顺序输出每个元素。
    ///             :nested <literal>
    ///             例如：
    ///                 :nested [1,[2,3,[4,5]],6,[7,[8,9]]]
    Nested { nested: Nested<String> },
}

impl Input {
    pub fn new_std_in() -> Input {
        Input::StdIn
    }
    pub fn new_file(files: Vec<String>) -> Input {
        Input::File { files }
    }
    pub fn new_of(values: Vec<String>) -> Input {
        Input::Of { values }
    }
    pub fn new_gen(start: Integer, stop: Option<Integer>, step: Integer, fmt: Option<String>) -> Input {
        Input::Gen { start, stop, step, fmt }
    }
    pub fn new_fib(fmt: Option<String>) -> Input {
        Input::Fib { fmt }
    }
    pub fn new_double(start: Integer) -> Input {
        Input::Double { start }
    }
    pub fn new_repeat(value: String, count: Option<usize>) -> Input {
        Input::Repeat { value, count }
    }
    pub fn new_nested(nested: Nested<String>) -> Input {
        Input::Nested { nested }
    }

    /// 构造输入序列。
    ///
    /// 参数错误（步长为0、格式化字符串不可用）在此处返回；文件在首次拉取时才打开，
    /// 读取过程中的错误按`--skip-err`处理。
    pub fn pipe(self, configs: &'static [Config]) -> Result<Pipe<String>, LpErr> {
        debug!(input = ?self, "build input");
        Ok(match self {
            Input::StdIn => lines_of(Pipe::new(TextLines::new("stdin", io::stdin().lock())), configs),
            Input::File { files } => {
                let lines = files.into_iter().flat_map(move |file| {
                    let opened = match TextLines::open(&file) {
                        Ok(lines) => Some(lines),
                        Err(err) => err.skip_or_exit(configs),
                    };
                    opened.into_iter().flatten()
                });
                lines_of(Pipe::new(lines), configs)
            }
            Input::Of { values } => of(values),
            Input::Gen { start, stop, step, fmt } => {
                let range = RangeIter::new(start, stop, step)?.into_pipe();
                formatted(range, fmt, configs)?
            }
            Input::Fib { fmt } => formatted(fibonacci(), fmt, configs)?,
            Input::Double { start } => doubling(start).op_map(|n| n.to_string()),
            Input::Repeat { value, count } => repeat(value, count),
            Input::Nested { nested } => nested.flatten(),
        })
    }
}

fn lines_of(lines: Pipe<Result<String, LpErr>>, configs: &'static [Config]) -> Pipe<String> {
    Pipe::new(lines.filter_map(move |line| match line {
        Ok(line) => Some(line),
        Err(err) => err.skip_or_exit(configs),
    }))
}

fn formatted<T>(pipe: Pipe<T>, fmt: Option<String>, configs: &'static [Config]) -> Result<Pipe<String>, LpErr>
where
    T: Into<FmtArg> + ToString + 'static,
{
    match fmt {
        Some(fmt) => {
            check_fmt(&fmt, FmtArg::Integer(0))?;
            Ok(Pipe::new(pipe.filter_map(move |v| match fmt_args(&fmt, &[("v", v.into())]) {
                Ok(string) => Some(string),
                Err(err) => err.skip_or_exit(configs),
            })))
        }
        None => Ok(pipe.op_map(|v| v.to_string())),
    }
}
