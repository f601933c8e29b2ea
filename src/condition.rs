use crate::err::LpErr;
use crate::num::Num;
use crate::{Float, Integer};
use cmd_help::CmdHelp;
use regex::Regex;

/// 带可选否定的筛选条件，用于`:take`、`:drop`和`:until`。
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Yes(Select),
    No(Select),
}

impl Condition {
    pub fn new(select: Select, not: bool) -> Condition {
        if not { Condition::No(select) } else { Condition::Yes(select) }
    }

    pub fn test(&self, item: &str) -> bool {
        match self {
            Condition::Yes(select) => select.matches(item),
            Condition::No(select) => !select.matches(item),
        }
    }
}

#[derive(Debug, Clone, PartialEq, CmdHelp)]
pub enum Select {
    /// [!]even     偶数。
    /// [!]odd      奇数，带小数部分的数既不是奇数也不是偶数。
    ///             非数值数据不满足条件。
    Parity { even: bool },
    /// [!]num      数值。
    ///             [!]num[ integer|float]
    ///                 integer 仅整数。
    ///                 float   仅有限浮点数，不包括整数写法的数据。
    ///             例如：
    ///                 !num integer
    Num { integer: Option<bool> },
    /// [!]num      数值在闭区间内，两端至少指定其一，非数值数据不满足条件。
    ///             [!]num [<min>],[<max>]
    ///             例如：
    ///                 num 100,
    ///                 num -2.5,2.5
    NumRange { min: Option<Num>, max: Option<Num> },
    /// [!]len      按字符数筛选。
    ///             [!]len <len>|[<min>],[<max>]
    ///             例如：
    ///                 len 3
    ///                 len ,8
    Len { min: Option<usize>, max: Option<usize> },
    /// [!]reg      整个数据匹配正则表达式。
    ///             [!]reg <regex>
    ///             例如：
    ///                 reg '\d+'
    Reg { pattern: Pattern },
}

impl Select {
    pub fn new_len(len: usize) -> Select {
        Select::Len { min: Some(len), max: Some(len) }
    }

    pub fn new_reg(regex: &str) -> Result<Select, LpErr> {
        Pattern::new(regex).map(|pattern| Select::Reg { pattern })
    }

    pub fn yes(self) -> Condition {
        Condition::Yes(self)
    }

    pub fn no(self) -> Condition {
        Condition::No(self)
    }

    fn matches(&self, item: &str) -> bool {
        match self {
            Select::Parity { even } => item.parse::<Num>().is_ok_and(|n| {
                let integral = n.as_float().fract() == 0.0;
                integral && n.is_even() == *even
            }),
            Select::Num { integer: None } => item.parse::<Num>().is_ok(),
            Select::Num { integer: Some(true) } => item.parse::<Integer>().is_ok(),
            Select::Num { integer: Some(false) } => {
                item.parse::<Integer>().is_err() && item.parse::<Float>().is_ok_and(Float::is_finite)
            }
            Select::NumRange { min, max } => item.parse::<Num>().is_ok_and(|n| within(n, *min, *max)),
            Select::Len { min, max } => within(item.chars().count(), *min, *max),
            Select::Reg { pattern } => pattern.0.is_match(item),
        }
    }
}

fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}

/// 锚定首尾的正则表达式，按原始表达式判等。
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(regex: &str) -> Result<Pattern, LpErr> {
        Regex::new(&format!(r"\A(?:{regex})\z"))
            .map(Pattern)
            .map_err(|err| LpErr::ParseRegexErr { reg: regex.to_owned(), err: err.to_string() })
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(cond: &Condition, items: &[&str]) -> Vec<String> {
        items.iter().filter(|item| cond.test(item)).map(|item| item.to_string()).collect()
    }

    #[test]
    fn test_parity() {
        let items = ["4", "-10", "4.0", "3", "3.5", "abc"];
        assert_eq!(taken(&Select::Parity { even: true }.yes(), &items), vec!["4", "-10", "4.0"]);
        assert_eq!(taken(&Select::Parity { even: false }.yes(), &items), vec!["3"]);
        assert_eq!(taken(&Select::Parity { even: true }.no(), &items), vec!["3", "3.5", "abc"]);
    }

    #[test]
    fn test_num() {
        let items = ["123", "-7", "7.5", "7.0", "nan", "-inf", "", "x"];
        assert_eq!(taken(&Select::Num { integer: None }.yes(), &items), vec!["123", "-7", "7.5", "7.0"]);
        assert_eq!(taken(&Select::Num { integer: Some(true) }.yes(), &items), vec!["123", "-7"]);
        assert_eq!(taken(&Select::Num { integer: Some(false) }.yes(), &items), vec!["7.5", "7.0"]);
        assert_eq!(taken(&Select::Num { integer: None }.no(), &items), vec!["nan", "-inf", "", "x"]);
    }

    #[test]
    fn test_num_range() {
        let items = ["2", "3", "4.5", "5", "5.1", "x"];
        let range = |min: Option<i64>, max: Option<i64>| Select::NumRange { min: min.map(Num::from), max: max.map(Num::from) };
        assert_eq!(taken(&range(Some(3), Some(5)).yes(), &items), vec!["3", "4.5", "5"]);
        assert_eq!(taken(&range(None, Some(3)).yes(), &items), vec!["2", "3"]);
        assert_eq!(taken(&range(Some(5), None).no(), &items), vec!["2", "3", "4.5", "x"]);
    }

    #[test]
    fn test_len() {
        let items = ["", "ab", "你好", "abc", "abcdef"];
        assert_eq!(taken(&Select::new_len(2).yes(), &items), vec!["ab", "你好"]);
        assert_eq!(taken(&Select::Len { min: Some(3), max: None }.yes(), &items), vec!["abc", "abcdef"]);
        assert_eq!(taken(&Select::Len { min: None, max: Some(2) }.no(), &items), vec!["abc", "abcdef"]);
    }

    #[test]
    fn test_reg() {
        assert!(matches!(Select::new_reg("["), Err(LpErr::ParseRegexErr { .. })));
        let digits = Select::new_reg(r"\d+").unwrap();
        assert_eq!(taken(&digits.clone().yes(), &["123", "123abc", ""]), vec!["123"]);
        assert_eq!(taken(&Select::new_reg("a|b").unwrap().yes(), &["a", "ab"]), vec!["a"]);
        assert_eq!(digits, Select::new_reg(r"\d+").unwrap());
        assert_ne!(digits, Select::new_reg(r"\d*").unwrap());
    }

    #[test]
    fn test_cmds() {
        assert_eq!(Select::cmds(), &["even", "odd", "num", "len", "reg"]);
    }
}
