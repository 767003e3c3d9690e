//! taxlot-report - Compute capital gains from a brokerage activity CSV.

fn main() -> std::process::ExitCode {
    taxlot::cmd::report_cmd::main()
}
