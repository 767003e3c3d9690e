//! taxlot-price - Fetch latest closing prices for ticker symbols.

fn main() -> std::process::ExitCode {
    taxlot::cmd::price_cmd::main()
}
