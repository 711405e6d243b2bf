use anyhow::Context;
use sum_native_script::{init_logging, run, Variant};

fn main() -> anyhow::Result<()> {
    init_logging();

    // Summing numbers from 1 to 50000000, end included
    run(Variant::Inclusive).context("sum over inclusive range failed")
}
