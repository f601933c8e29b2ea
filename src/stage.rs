use crate::pipe::Pipe;

/// 流水线阶段：从一个惰性序列到另一个惰性序列的转换。
pub type Stage<T> = Box<dyn FnOnce(Pipe<T>) -> Pipe<T>>;

/// 按顺序将各阶段依次套在数据源上：`stages[n](...stages[1](stages[0](source)))`。
///
/// 组合本身不会拉取任何元素。
pub fn compose<T: 'static>(stages: impl IntoIterator<Item = Stage<T>>, source: Pipe<T>) -> Pipe<T> {
    stages.into_iter().fold(source, |pipe, stage| stage(pipe))
}

pub fn map_stage<T: 'static>(f: impl FnMut(T) -> T + 'static) -> Stage<T> {
    Box::new(move |pipe: Pipe<T>| pipe.op_map(f))
}

pub fn filter_stage<T: 'static>(predicate: impl FnMut(&T) -> bool + 'static) -> Stage<T> {
    Box::new(move |pipe: Pipe<T>| pipe.op_filter(predicate))
}

pub fn inspect_stage<T: 'static>(f: impl FnMut(&T) + 'static) -> Stage<T> {
    Box::new(move |pipe: Pipe<T>| pipe.op_inspect(f))
}

pub fn bound_stage<T: 'static>(count: usize) -> Stage<T> {
    Box::new(move |pipe: Pipe<T>| pipe.bounded(count))
}
