use crate::config::{Config, skip_err};
use crate::println_err;
use std::process::{ExitCode, Termination};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Eq, PartialEq)]
pub enum LpErr {
    #[error("[Arg Parse Err] Unable to parse `{arg_value}` in argument `{arg}` of cmd `{cmd}`, error: {error}")]
    ArgParseErr { cmd: &'static str, arg: &'static str, arg_value: String, error: String },

    #[error("[Missing Arg] Missing argument `{arg}` of cmd `{cmd}`")]
    MissingArg { cmd: &'static str, arg: &'static str },

    #[error("[Missing Arg] At least one value for argument `{arg}` is required for cmd `{cmd}`")]
    ArgNotEnough { cmd: &'static str, arg: &'static str },

    #[error("[Bad Arg] Closing bracket (`]`) for argument `{arg}` is required for cmd `{cmd}`")]
    UnclosingMultiArg { cmd: &'static str, arg: &'static str },

    #[error("[Bad Arg] Unexpected closing bracket of argument `{arg}` for cmd `{cmd}`")]
    UnexpectedClosingBracket { cmd: &'static str, arg: &'static str },

    #[error("[Bad Arg] Unknown cmd `{cmd}`, see `lp -h` for available cmds")]
    UnknownCmd { cmd: String },

    #[error("[Bad Arg] Unknown arguments: {args:?}")]
    UnknownArgs { args: Vec<String> },

    #[error("[Bad Arg] Invalid regex `{reg}`: {err}")]
    ParseRegexErr { reg: String, err: String },

    #[error("[Bad Arg] Invalid format `{fmt}`: {err}")]
    FormatErr { fmt: String, err: String },

    #[error("[Bad Arg] Step of a range must not be zero")]
    ZeroStep,

    #[error("[Pipe] Sequence is exhausted")]
    Exhausted,

    #[error("[Pipe] Accumulator must produce its initial total before accepting a value")]
    AccumulatorNotStarted,

    #[error("[Record] Line `{line_no}` has {actual} fields, but header has {expected}")]
    FieldCountMismatch { line_no: usize, expected: usize, actual: usize },

    #[error("[Input] Open input file `{file}` error: {err}")]
    OpenFileErr { file: String, err: String },

    #[error("[Input] Read line `{line_no}` of `{file}` error: {err}")]
    ReadFromFileErr { file: String, line_no: usize, err: String },

    #[error("[Output] Write item `{item}` to file `{file}` error: {err}")]
    WriteToFileErr { file: String, item: String, err: String },

    #[error("[Output] Write item `{item}` to stdout error: {err}")]
    WriteToStdOutErr { item: String, err: String },
}

impl Termination for LpErr {
    fn report(self) -> ExitCode {
        println_err!("{}", self);
        ExitCode::from(self.exit_code())
    }
}

impl LpErr {
    pub fn termination(self) -> ! {
        let exit_code = self.exit_code();
        self.report();
        std::process::exit(exit_code as i32);
    }

    /// 处理流水线运行中产生的错误：指定了`--skip-err`时记录警告并跳过，否则终止进程。
    pub fn skip_or_exit<T>(self, configs: &[Config]) -> Option<T> {
        if skip_err(configs) {
            warn!(err = %self, "skipped");
            None
        } else {
            self.termination()
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            LpErr::ArgParseErr { .. } => 1,
            LpErr::MissingArg { .. } => 2,
            LpErr::ArgNotEnough { .. } => 3,
            LpErr::UnclosingMultiArg { .. } => 4,
            LpErr::UnexpectedClosingBracket { .. } => 5,
            LpErr::UnknownCmd { .. } => 6,
            LpErr::UnknownArgs { .. } => 7,
            LpErr::ParseRegexErr { .. } => 8,
            LpErr::FormatErr { .. } => 9,
            LpErr::ZeroStep => 10,
            LpErr::Exhausted => 11,
            LpErr::AccumulatorNotStarted => 12,
            LpErr::FieldCountMismatch { .. } => 13,
            LpErr::OpenFileErr { .. } => 14,
            LpErr::ReadFromFileErr { .. } => 15,
            LpErr::WriteToFileErr { .. } => 16,
            LpErr::WriteToStdOutErr { .. } => 17,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_is_distinct() {
        let errs = [
            LpErr::ArgParseErr { cmd: "", arg: "", arg_value: String::new(), error: String::new() },
            LpErr::MissingArg { cmd: "", arg: "" },
            LpErr::ArgNotEnough { cmd: "", arg: "" },
            LpErr::UnclosingMultiArg { cmd: "", arg: "" },
            LpErr::UnexpectedClosingBracket { cmd: "", arg: "" },
            LpErr::UnknownCmd { cmd: String::new() },
            LpErr::UnknownArgs { args: vec![] },
            LpErr::ParseRegexErr { reg: String::new(), err: String::new() },
            LpErr::FormatErr { fmt: String::new(), err: String::new() },
            LpErr::ZeroStep,
            LpErr::Exhausted,
            LpErr::AccumulatorNotStarted,
            LpErr::FieldCountMismatch { line_no: 0, expected: 0, actual: 0 },
            LpErr::OpenFileErr { file: String::new(), err: String::new() },
            LpErr::ReadFromFileErr { file: String::new(), line_no: 0, err: String::new() },
            LpErr::WriteToFileErr { file: String::new(), item: String::new(), err: String::new() },
            LpErr::WriteToStdOutErr { item: String::new(), err: String::new() },
        ];
        let mut codes = errs.iter().map(LpErr::exit_code).collect::<Vec<_>>();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
        assert!(!codes.contains(&0));
    }

    #[test]
    fn test_skip_or_exit() {
        assert_eq!(LpErr::Exhausted.skip_or_exit::<()>(&[Config::SkipErr]), None);
    }

    #[test]
    fn test_message() {
        assert_eq!(
            LpErr::FieldCountMismatch { line_no: 3, expected: 3, actual: 2 }.to_string(),
            "[Record] Line `3` has 2 fields, but header has 3"
        );
        assert_eq!(LpErr::MissingArg { cmd: ":limit", arg: "count" }.to_string(), "[Missing Arg] Missing argument `count` of cmd `:limit`");
    }
}
