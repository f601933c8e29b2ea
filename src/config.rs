#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Config {
    /// 帮助 `-h[ <topic>]`
    Help(Option<String>),
    /// 版本 `-V`
    Version,
    /// 打印流水线信息并输出调试日志 `-v`
    Verbose,
    /// 仅解析，不执行 `-d`
    DryRun,
    /// 全局忽略大小写 `--nocase`
    Nocase,
    /// 跳过无法读取的文件、行以及不合法的记录 `--skip-err`
    SkipErr,
}

#[inline]
pub fn is_nocase(nocase: bool, configs: &[Config]) -> bool {
    nocase || configs.contains(&Config::Nocase)
}

#[inline]
pub fn skip_err(configs: &[Config]) -> bool {
    configs.contains(&Config::SkipErr)
}

#[inline]
pub fn is_verbose(configs: &[Config]) -> bool {
    configs.contains(&Config::Verbose)
}
