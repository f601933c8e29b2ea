use crate::err::LpErr;
use crate::output::Output;
use crate::parse::args::{consume_keyword, parse_general_file_info};
use std::iter::Peekable;

pub(in crate::parse::args) fn parse_output(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Output, LpErr> {
    if !consume_keyword(args, "to") {
        return Ok(Output::new_std_out());
    }
    if consume_keyword(args, "file") {
        parse_file(args)
    } else {
        // `to out`或仅有`to`，其他参数留给调用者报错
        consume_keyword(args, "out");
        Ok(Output::new_std_out())
    }
}

fn parse_file(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Output, LpErr> {
    match parse_general_file_info(args) {
        Some((file, append, crlf)) => Ok(Output::new_file(file, append, crlf)),
        None => Err(LpErr::MissingArg { cmd: "to file", arg: "file" }),
    }
}
