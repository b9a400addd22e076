fn main() -> std::process::ExitCode {
  diange_lib::run()
}
