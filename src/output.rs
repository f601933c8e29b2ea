use crate::err::LpErr;
use crate::pipe::Pipe;
use cmd_help::CmdHelp;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, ErrorKind, Write};
use tracing::debug;

#[derive(Debug, Eq, PartialEq, CmdHelp)]
pub enum Output {
    /// to out      输出到标准输出。
    ///             未指定输出时的默认输出。
    StdOut,
    /// to file     输出到文件。
    ///             to file <file>[ append][ lf|crlf]
    ///                 <file>  文件路径，必选。
    ///                 append  追加输出而不是覆盖，可选。
    ///                 lf|crlf 指定换行符为'LF'或'CRLF'，可选，默认'LF'。
    ///             例如：
    ///                 to file out.txt
    ///                 to file out.txt append crlf
    File { file: String, append: bool, crlf: Option<bool> },
}

impl Output {
    pub fn new_std_out() -> Self {
        Output::StdOut
    }
    pub fn new_file(file: String, append: bool, crlf: Option<bool>) -> Self {
        Output::File { file, append, crlf }
    }

    /// 逐个拉取并输出，直到输入耗尽或下游关闭。
    pub fn handle(self, pipe: Pipe<String>) -> Result<(), LpErr> {
        match self {
            Output::StdOut => {
                let count = write_pipe(pipe, &mut io::stdout().lock(), "\n", |item, err| LpErr::WriteToStdOutErr {
                    item,
                    err: err.to_string(),
                })?;
                debug!(count, "written to stdout");
                Ok(())
            }
            Output::File { file, append, crlf } => {
                let writer = OpenOptions::new()
                    .write(true)
                    .truncate(!append)
                    .append(append)
                    .create(true)
                    .open(&file)
                    .map_err(|err| LpErr::OpenFileErr { file: file.clone(), err: err.to_string() })?;
                let ending = if crlf.unwrap_or(false) { "\r\n" } else { "\n" };
                let count = write_pipe(pipe, &mut BufWriter::new(writer), ending, |item, err| {
                    LpErr::WriteToFileErr { file: file.clone(), item, err: err.to_string() }
                })?;
                debug!(file = %file, count, "written to file");
                Ok(())
            }
        }
    }
}

/// 写出全部数据并返回写出的数量。
///
/// 下游关闭（`BrokenPipe`）视为正常结束，不再拉取后续数据。
fn write_pipe<W: Write>(
    pipe: Pipe<String>, writer: &mut W, ending: &str, to_err: impl Fn(String, io::Error) -> LpErr,
) -> Result<usize, LpErr> {
    let mut count = 0usize;
    for item in pipe {
        if let Err(err) = write!(writer, "{item}{ending}") {
            if err.kind() == ErrorKind::BrokenPipe {
                debug!(count, "output closed");
                return Ok(count);
            }
            return Err(to_err(item, err));
        }
        count += 1;
    }
    match writer.flush() {
        Err(err) if err.kind() != ErrorKind::BrokenPipe => Err(to_err(String::new(), err)),
        _ => Ok(count),
    }
}
