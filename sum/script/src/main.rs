use anyhow::Context;
use sum_native_script::{init_logging, run, Variant};

fn main() -> anyhow::Result<()> {
    init_logging();

    // Summing numbers from 0 to 50000000, end excluded
    run(Variant::HalfOpen).context("sum over half-open range failed")
}
