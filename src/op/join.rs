use itertools::Itertools;

#[derive(Debug, PartialEq, Default, Clone)]
pub struct JoinInfo {
    pub delimiter: String,
    pub prefix: String,
    pub postfix: String,
}

impl JoinInfo {
    pub fn join(&self, items: impl Iterator<Item = String>) -> String {
        format!("{}{}{}", self.prefix, items.format(&self.delimiter), self.postfix)
    }
}

/// 每`group_size`个元素合并为一个，最后一组可以不满。
pub struct ChunkJoin<I: Iterator<Item = String>> {
    source: I,
    group_size: usize,
    join_info: JoinInfo,
}

impl<I: Iterator<Item = String>> ChunkJoin<I> {
    pub fn new(source: I, group_size: usize, join_info: JoinInfo) -> ChunkJoin<I> {
        ChunkJoin { source, group_size, join_info }
    }
}

impl<I> Iterator for ChunkJoin<I>
where
    I: Iterator<Item = String>,
{
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let mut chunk = self.source.by_ref().take(self.group_size).peekable();
        chunk.peek()?;
        Some(self.join_info.join(chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(delimiter: &str, prefix: &str, postfix: &str) -> JoinInfo {
        JoinInfo { delimiter: delimiter.to_string(), prefix: prefix.to_string(), postfix: postfix.to_string() }
    }

    fn strings(values: &[&str]) -> impl Iterator<Item = String> {
        values.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_join() {
        assert_eq!(info(",", "[", "]").join(strings(&["a", "b", "c"])), "[a,b,c]");
        assert_eq!(info(",", "", "").join(strings(&[])), "");
    }

    #[test]
    fn test_chunk_join() {
        let joined = ChunkJoin::new(strings(&["1", "2", "3", "4", "5"]), 2, info("+", "(", ")")).collect::<Vec<_>>();
        assert_eq!(joined, vec!["(1+2)", "(3+4)", "(5)"]);
        assert_eq!(ChunkJoin::new(strings(&[]), 2, JoinInfo::default()).next(), None);
    }

    #[test]
    fn test_chunk_join_lazy_on_unbounded() {
        let mut joined = ChunkJoin::new((0..).map(|n| n.to_string()), 3, info(" ", "", ""));
        assert_eq!(joined.next(), Some("0 1 2".to_string()));
        assert_eq!(joined.next(), Some("3 4 5".to_string()));
    }
}
