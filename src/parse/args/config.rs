use crate::config::Config;
use std::iter::Peekable;

pub fn parse_configs(args: &mut Peekable<impl Iterator<Item = String>>) -> Vec<Config> {
    let mut configs = Vec::new();
    while let Some(config) = parse_config(args) {
        configs.push(config);
    }
    configs
}

fn parse_config(args: &mut Peekable<impl Iterator<Item = String>>) -> Option<Config> {
    let config = match args.peek()?.as_str() {
        "-h" => Config::Help(None),
        "-V" => Config::Version,
        "-v" => Config::Verbose,
        "-d" => Config::DryRun,
        "--nocase" => Config::Nocase,
        "--skip-err" => Config::SkipErr,
        _ => return None, // 遇到未知参数，停止解析（由调用者处理）
    };
    args.next();
    if config == Config::Help(None) {
        // 可选的帮助主题
        return Some(Config::Help(args.next_if(|topic| HELP_TOPICS.contains(&topic.to_ascii_lowercase().as_str()))));
    }
    Some(config)
}

const HELP_TOPICS: [&str; 5] = ["input", "op", "output", "cond", "fmt"];
