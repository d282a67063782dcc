//! Benchmark suite for ledger operations
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Scripts are generated in memory: each customer opens a savings and a
//! current account, moves funds between them and accrues interest.

use ledger_engine::io::CommandReader;
use ledger_engine::notify::MemorySink;
use ledger_engine::Replay;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::thread;

fn main() {
    divan::main();
}

/// Command script with `customers` customers and seven commands each
fn script(customers: usize) -> String {
    let mut csv = String::from("op,customer,account,counterparty,amount,name,email\n");
    for i in 1..=customers {
        let savings = 2 * i - 1;
        let current = 2 * i;
        csv.push_str(&format!("register,,,,,Customer {i},customer{i}@example.com\n"));
        csv.push_str(&format!("open_savings,{i},,,,,\n"));
        csv.push_str(&format!("open_current,{i},,,,,\n"));
        csv.push_str(&format!("deposit,,{savings},{current},250.00,,\n"));
        csv.push_str(&format!("withdraw,,{current},,19.99,,\n"));
        csv.push_str(&format!("transfer,,{current},{savings},100.00,,\n"));
        csv.push_str(&format!("interest,,{savings},,,,\n"));
    }
    csv
}

/// Parse and apply a whole script
#[divan::bench(args = [100, 1_000, 10_000])]
fn replay_script(bencher: divan::Bencher, customers: usize) {
    let input = script(customers);

    bencher.bench_local(|| {
        let replay = Replay::new(Arc::new(MemorySink::new()));
        let reader = CommandReader::from_reader(input.as_bytes());
        divan::black_box(replay.run(reader))
    });
}

/// Withdrawals from distinct accounts on several threads at once
#[divan::bench(args = [1, 4, 8])]
fn parallel_withdrawals(bencher: divan::Bencher, threads: usize) {
    let input = script(threads);

    bencher
        .with_inputs(|| {
            let replay = Replay::new(Arc::new(MemorySink::new()));
            replay.run(CommandReader::from_reader(input.as_bytes()));
            replay
        })
        .bench_local_values(|replay| {
            thread::scope(|scope| {
                for i in 1..=threads {
                    let engine = replay.engine();
                    scope.spawn(move || {
                        for _ in 0..100 {
                            let _ = engine.withdraw(2 * i as u64, Decimal::ONE);
                        }
                    });
                }
            });
        });
}
