fn main() {
    if let Err(e) = lazypipe::run(std::env::args().skip(1)) {
        e.termination();
    }
}
