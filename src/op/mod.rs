mod join;

pub use join::JoinInfo;

use crate::Float;
use crate::accumulator::Accumulator;
use crate::condition::Condition;
use crate::config::{Config, is_nocase};
use crate::err::LpErr;
use crate::fmt::{FmtArg, check_fmt, fmt_args};
use crate::num::Num;
use crate::op::join::ChunkJoin;
use crate::pipe::Pipe;
use crate::record::{FieldPolicy, records};
use crate::stage::Stage;
use cmd_help::CmdHelp;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use std::cmp::Reverse;
use std::fs::OpenOptions;
use std::io::{self, ErrorKind, Write};
use std::iter::once_with;
use tracing::debug;
use unicase::UniCase;

#[derive(Debug, PartialEq, CmdHelp)]
pub enum Op {
    /* **************************************** 访问 **************************************** */
    /// :peek       打印每个经过的值到标准输出或文件，不改变数据。
    ///             :peek[ <file>][ append][ lf|crlf]
    ///                 <file>  文件路径，可选。
    ///                 append  追加输出而不是覆盖，可选。
    ///                 lf|crlf 指定换行符为'LF'或'CRLF'，可选，默认'LF'。
    ///             例如：
    ///                 :peek
    ///                 :peek trace.txt append
    Peek(PeekArg),
    /* **************************************** 转换 **************************************** */
    /// :square     数值平方，无法解析为数的数据保持不变。
    /// :add        数值加上给定值，无法解析为数的数据保持不变。
    ///             :add <num>
    /// :mul        数值乘以给定值，无法解析为数的数据保持不变。
    ///             :mul <num>
    Arith(ArithArg),
    /* **************************************** 减少 **************************************** */
    /// :limit      保留前N个数据，丢弃后续的其他数据，用于限定无限输入。
    ///             :limit <count>
    ///                 <count> 需要保留的数量，非负整数，必选。
    Limit { count: usize },
    /// :skip       丢弃前N个数据，保留后续的其他数据。
    ///             :skip <count>
    ///                 <count> 需要丢弃的数量，非负整数，必选。
    Skip { count: usize },
    /// :take       根据条件选择数据保留，其他数据丢弃。
    ///             :take <condition>
    /// :drop       根据条件选择数据丢弃，其他数据保留。
    ///             :drop <condition>
    /// :take while 持续保留数据，直到条件首次不满足。
    ///             :take while <condition>
    /// :drop while 持续丢弃数据，直到条件首次不满足。
    ///             :drop while <condition>
    ///                 <condition> 条件表达式，参考`-h cond`。
    ///             例如：
    ///                 :take even
    ///                 :drop while !num
    TakeDrop { mode: TakeDropMode, cond: Condition },
    /// :until      以首个满足条件的数据为哨兵，保留之前的数据，丢弃哨兵及之后的数据。
    ///             :until <condition>
    ///             例如：
    ///                 :until num 100,
    Until { cond: Condition },
    /// :uniq       去重，只保留每个值首次出现的数据。
    ///             :uniq[ nocase]
    ///                 nocase  忽略大小写，可选。
    Uniq { nocase: bool },
    /// :sum        累加数值，输出一个总和，无法解析为数的数据被忽略。
    ///             :sum[ <fmt>]
    ///                 <fmt>   格式化字符串，以{v}表示总和，参考`-h fmt`。
    ///             例如：
    ///                 :sum
    ///                 :sum "Total: {v}"
    Sum { fmt: Option<String> },
    /// :acc        输出累加过程中的每个总和，无法解析为数的数据被忽略。
    Acc,
    /// :count      统计数据数量。
    Count,
    /// :join       合并数据。
    ///             :join[ <delimiter>[ <prefix>[ <postfix>[ <batch>]]]]
    ///                 <delimiter> 分隔字符串，可选。
    ///                 <prefix>    前缀字符串，可选。
    ///                 <postfix>   后缀字符串，可选。
    ///                 <batch>     分组大小，正整数，可选，未指定时所有数据为一组。
    ///             例如：
    ///                 :join ,
    ///                 :join , [ ] 3
    Join { join_info: JoinInfo, batch: Option<usize> },
    /* **************************************** 调整位置 **************************************** */
    /// :sort       排序，需要读取全部数据，不能用于无限输入。
    ///             :sort[ num[ <default>]][ nocase][ desc]
    ///                 num         按照数值排序，无法解析的数据按<default>排序，
    ///                             未指定<default>时无论升序逆序都排在最后。
    ///                 nocase      忽略大小写，仅按字典序排序时生效。
    ///                 desc        逆序排序。
    ///             :sort random
    ///                 随机排序。
    Sort { sort_by: SortBy, desc: bool },
    /* **************************************** 结构化 **************************************** */
    /// :csv        首行作为表头，后续每行拆分为字段并与表头配对，输出为`{name: value, ...}`。
    ///             :csv[ <delimiter>][ strict]
    ///                 <delimiter> 字段分隔符，可选，默认','。
    ///                 strict      字段数与表头不一致时报错，可选，
    ///                             未指定时按位置配对，以较短的一方为准。
    ///             例如：
    ///                 :csv
    ///                 :csv ; strict
    Csv { delimiter: String, policy: FieldPolicy },
}

impl Op {
    pub fn new_join(join_info: JoinInfo, batch: Option<usize>) -> Op {
        Op::Join { join_info, batch }
    }
    pub fn new_take_drop(mode: TakeDropMode, cond: Condition) -> Op {
        Op::TakeDrop { mode, cond }
    }
    pub fn new_sort(sort_by: SortBy, desc: bool) -> Op {
        Op::Sort { sort_by, desc }
    }
    pub fn new_csv(delimiter: Option<String>, strict: bool) -> Op {
        let policy = if strict { FieldPolicy::Strict } else { FieldPolicy::Zip };
        Op::Csv { delimiter: delimiter.unwrap_or_else(|| ",".to_string()), policy }
    }

    /// 构造流水线阶段。
    ///
    /// 需要提前确定的资源（输出文件、格式化字符串）在此处准备，出错时直接返回；
    /// 阶段本身不会拉取任何数据。
    pub fn stage(self, configs: &'static [Config]) -> Result<Stage<String>, LpErr> {
        debug!(op = ?self, "build stage");
        let stage: Stage<String> = match self {
            Op::Peek(PeekArg::StdOut) => Box::new(move |pipe: Pipe<String>| {
                pipe.op_inspect(move |item| {
                    // 下游关闭时由输出端结束流水线
                    if let Err(err) = writeln!(io::stdout().lock(), "{item}")
                        && err.kind() != ErrorKind::BrokenPipe
                    {
                        LpErr::WriteToStdOutErr { item: item.to_string(), err: err.to_string() }.skip_or_exit::<()>(configs);
                    }
                })
            }),
            Op::Peek(PeekArg::File { file, append, crlf }) => {
                let mut writer = OpenOptions::new()
                    .write(true)
                    .truncate(!append)
                    .append(append)
                    .create(true)
                    .open(&file)
                    .map_err(|err| LpErr::OpenFileErr { file: file.clone(), err: err.to_string() })?;
                let postfix = if crlf.unwrap_or(false) { "\r\n" } else { "\n" };
                Box::new(move |pipe: Pipe<String>| {
                    pipe.op_inspect(move |item| {
                        if let Err(err) = write!(writer, "{item}{postfix}") {
                            LpErr::WriteToFileErr { file: file.clone(), item: item.to_string(), err: err.to_string() }
                                .skip_or_exit::<()>(configs);
                        }
                    })
                })
            }
            Op::Arith(arith_arg) => Box::new(move |pipe: Pipe<String>| {
                pipe.op_map(move |item| match item.parse::<Num>() {
                    Ok(num) => arith_arg.apply(num).to_string(),
                    Err(_) => item,
                })
            }),
            Op::Limit { count } => Box::new(move |pipe: Pipe<String>| pipe.bounded(count)),
            Op::Skip { count } => Box::new(move |pipe: Pipe<String>| Pipe::new(pipe.skip(count))),
            Op::TakeDrop { mode, cond } => Box::new(move |pipe: Pipe<String>| match mode {
                TakeDropMode::Take => pipe.op_filter(move |s| cond.test(s)),
                TakeDropMode::Drop => pipe.op_filter(move |s| !cond.test(s)),
                TakeDropMode::TakeWhile => Pipe::new(pipe.take_while(move |s| cond.test(s))),
                TakeDropMode::DropWhile => Pipe::new(pipe.skip_while(move |s| cond.test(s))),
            }),
            Op::Until { cond } => Box::new(move |pipe: Pipe<String>| pipe.until(move |s| cond.test(s))),
            Op::Uniq { nocase } => {
                if is_nocase(nocase, configs) {
                    Box::new(|pipe: Pipe<String>| pipe.distinct_by(|item| UniCase::new(item.clone())))
                } else {
                    Box::new(|pipe: Pipe<String>| pipe.distinct_by(String::clone))
                }
            }
            Op::Sum { fmt } => {
                if let Some(fmt) = &fmt {
                    check_fmt(fmt, FmtArg::Integer(0))?;
                }
                Box::new(move |pipe: Pipe<String>| {
                    // 总和在首次拉取时才计算
                    Pipe::new(
                        once_with(move || {
                            let mut acc = Accumulator::<Num>::new();
                            acc.produce();
                            for num in pipe.filter_map(|s| s.parse::<Num>().ok()) {
                                acc.accept(num).unwrap_or_else(|_| unreachable!("accumulator is started"));
                            }
                            let total = acc.produce();
                            match &fmt {
                                // 浮点总和不支持仅限整数的格式
                                Some(fmt) => match fmt_args(fmt, &[("v", FmtArg::from(total))]) {
                                    Ok(formatted) => Some(formatted),
                                    Err(err) => err.skip_or_exit(configs),
                                },
                                None => Some(total.to_string()),
                            }
                        })
                        .flatten(),
                    )
                })
            }
            Op::Acc => Box::new(|pipe: Pipe<String>| {
                Pipe::new(pipe.filter_map(|s| s.parse::<Num>().ok())).running_total().op_map(|total| total.to_string())
            }),
            Op::Count => Box::new(|pipe: Pipe<String>| Pipe::new(once_with(move || pipe.count().to_string()))),
            Op::Join { join_info, batch } => match batch {
                Some(batch) if batch > 0 => {
                    Box::new(move |pipe: Pipe<String>| Pipe::new(ChunkJoin::new(pipe, batch, join_info)))
                }
                // 未分组时所有数据合并为一个
                _ => Box::new(move |pipe: Pipe<String>| Pipe::new(once_with(move || join_info.join(pipe)))),
            },
            Op::Sort { sort_by, desc } => {
                // 排序需要全部数据，推迟到首次拉取时进行
                Box::new(move |pipe: Pipe<String>| Pipe::new(once_with(move || sort(pipe, sort_by, desc, configs)).flatten()))
            }
            Op::Csv { delimiter, policy } => Box::new(move |pipe: Pipe<String>| {
                Pipe::new(records(pipe, delimiter, policy).filter_map(move |record| match record {
                    Ok(record) => Some(record.to_string()),
                    Err(err) => err.skip_or_exit(configs),
                }))
            }),
        };
        Ok(stage)
    }
}

fn sort(pipe: Pipe<String>, sort_by: SortBy, desc: bool, configs: &[Config]) -> std::vec::IntoIter<String> {
    match sort_by {
        SortBy::Num(default) => {
            // 未指定默认值时无法解析的数据总是排在最后
            let last = if desc { Float::NEG_INFINITY } else { Float::INFINITY };
            let default = default.map(Num::as_float).unwrap_or(last);
            let key_fn = move |item: &String| OrderedFloat(item.parse::<Num>().map(Num::as_float).unwrap_or(default));
            if desc { pipe.sorted_by_key(|item| Reverse(key_fn(item))) } else { pipe.sorted_by_key(key_fn) }
        }
        SortBy::Text(nocase) => {
            if is_nocase(nocase, configs) {
                if desc {
                    pipe.sorted_by_key(|item| Reverse(UniCase::new(item.clone())))
                } else {
                    pipe.sorted_by_key(|item| UniCase::new(item.clone()))
                }
            } else if desc {
                pipe.sorted_by(|a, b| b.cmp(a))
            } else {
                pipe.sorted()
            }
        }
        SortBy::Random => {
            let mut v = pipe.collect::<Vec<_>>();
            v.shuffle(&mut rand::rng());
            v.into_iter()
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum PeekArg {
    StdOut,
    File { file: String, append: bool, crlf: Option<bool> },
}

#[derive(Debug, PartialEq)]
pub enum ArithArg {
    Square,
    Add(Num),
    Mul(Num),
}

impl ArithArg {
    fn apply(&self, num: Num) -> Num {
        match self {
            ArithArg::Square => num.square(),
            ArithArg::Add(rhs) => num + *rhs,
            ArithArg::Mul(rhs) => num * *rhs,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum SortBy {
    Num(Option<Num>),
    Text(bool /*nocase*/),
    Random,
}

#[derive(Debug, PartialEq)]
pub enum TakeDropMode {
    Take,
    Drop,
    TakeWhile,
    DropWhile,
}
