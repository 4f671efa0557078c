fn main() {
    cohctl::run();
}
