//! 惰性、按需拉取的序列流水线。
//!
//! 库部分提供惰性序列[`Pipe`](pipe::Pipe)、阶段[`Stage`](stage::Stage)与组合[`compose`](stage::compose)、
//! 各类数据源、累加器、嵌套展开以及行/记录处理；命令行部分将参数解析为
//! 一个输入、若干操作和一个输出，并组合为流水线运行。

pub mod accumulator;
pub mod condition;
pub mod config;
pub mod cursor;
pub mod err;
pub mod flatten;
pub mod fmt;
pub mod input;
pub mod lines;
pub mod num;
pub mod op;
pub mod output;
pub mod parse;
pub mod pipe;
pub mod print;
pub mod record;
pub mod source;
pub mod stage;

use crate::condition::Select;
use crate::config::{Config, is_verbose};
use crate::err::LpErr;
use crate::input::Input;
use crate::op::Op;
use crate::output::Output;
use crate::stage::{Stage, compose};
use itertools::Itertools;
use tracing::Level;

/// 整数类型
pub type Integer = i64;
/// 浮点数类型
pub type Float = f64;

const USAGE: &str = "\
Usage: lp [<config>...] [<input>] [<op>...] [to <output>]

Configs:
    -h[ <topic>]    打印帮助信息，主题可选：input, op, output, cond, fmt
    -V              打印版本信息
    -v              打印流水线信息并输出调试日志
    -d              仅解析参数，不执行
    --nocase        全局忽略大小写
    --skip-err      跳过无法读取的文件、行以及不合法的记录

Example:
    lp :gen 1,11 :take even :square
    lp :file data.csv :csv :peek to file records.txt";

const FMT_HELP: &str = "\
格式化字符串以{v}表示当前值，支持Rust格式化语法：
    {v}         默认格式
    {v:>5}      右对齐，宽度5
    {v:<5}      左对齐，宽度5
    {v:^5}      居中，宽度5
    {v:05}      宽度5，不足时补0
    {v:+}       总是带符号
    {v:.2}      保留2位小数
    {v:x}       十六进制，仅限整数
    {v:#04x}    带前缀的十六进制，宽度4，仅限整数
    {v:b}       二进制，仅限整数
    {v:o}       八进制，仅限整数
    {v:e}       科学计数法
    {{ 和 }}    转义的花括号";

pub fn run(args: impl Iterator<Item = String>) -> Result<(), LpErr> {
    let mut args = args.peekable();
    let configs: &'static [Config] = parse::parse_configs(&mut args).leak();
    if let Some(Config::Help(topic)) = configs.iter().find(|c| matches!(c, Config::Help(_))) {
        print_help(topic.as_deref());
        return Ok(());
    }
    if configs.contains(&Config::Version) {
        println_info!("lp {} (built at {})", env!("CARGO_PKG_VERSION"), env!("LP_BUILD_TIME"));
        return Ok(());
    }
    init_tracing(configs);

    let (input, ops, output) = parse::parse(args)?;
    if is_verbose(configs) {
        print_pipeline(&input, &ops, &output);
    }
    if configs.contains(&Config::DryRun) {
        return Ok(());
    }
    let stages = ops.into_iter().map(|op| op.stage(configs)).collect::<Result<Vec<Stage<String>>, _>>()?;
    output.handle(compose(stages, input.pipe(configs)?))
}

fn init_tracing(configs: &[Config]) {
    let level = if is_verbose(configs) { Level::DEBUG } else { Level::WARN };
    // 重复初始化（例如测试中）时忽略
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_pipeline(input: &Input, ops: &[Op], output: &Output) {
    println_info!("Input:");
    println_info!("    {:?}", input);
    println_info!("Op:");
    println_info!("{}", ops.iter().map(|op| format!("    {:?}", op)).join("\n"));
    println_info!("Output:");
    println_info!("    {:?}", output);
}

fn print_help(topic: Option<&str>) {
    let helps = match topic.map(str::to_ascii_lowercase).as_deref() {
        Some("input") => Input::all_help(),
        Some("op") => Op::all_help(),
        Some("output") => Output::all_help(),
        Some("cond") => Select::all_help(),
        Some("fmt") => {
            println!("{FMT_HELP}");
            return;
        }
        _ => {
            println!("{USAGE}");
            return;
        }
    };
    for (_, help) in helps {
        println!("{help}");
    }
}
