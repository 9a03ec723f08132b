//! 从文件加载自动机, 对标准输入中的每一行 (以空白分隔的终结符) 运行一次,
//! 输出运行轨迹, 是否接受, 以及接受时的最右推导.
use std::{
    fs,
    io::{self, BufRead},
    path::PathBuf,
};

use bumpalo::Bump;
use clap::Parser;
use dpda::{Definition, Derivation, Terminal};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{Layer, fmt, layer::SubscriberExt, registry, util::SubscriberInitExt};

#[derive(clap::Parser)]
struct AppArgs {
    /// 自动机定义文件.
    #[clap(short, long)]
    automaton: PathBuf,
    /// 先输出 markdown 格式的转移表.
    #[clap(short, long)]
    table: bool,
    /// 每次运行最多的格局数.
    #[clap(short, long)]
    step_limit: Option<usize>,
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = AppArgs::parse();
    let level = if args.verbose || cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let layer = fmt::layer()
        .without_time()
        .with_writer(io::stderr)
        .with_filter(level);
    registry().with(layer).init();

    let source = fs::read_to_string(&args.automaton)?;
    let bump = Bump::new();
    let Definition { automaton, grammar } = Definition::parse(&source, &bump)?;
    let automaton = match args.step_limit {
        Some(limit) => automaton.with_step_limit(limit),
        None => automaton,
    };
    info!(
        "{} states, {} transitions, {} rules",
        automaton.state_count(),
        automaton.table().len(),
        grammar.rules().len()
    );
    if args.table {
        if let Some(start) = grammar.start() {
            println!("start: {start}");
            println!("variables: {:?}", grammar.variables());
            println!("terminals: {:?}", grammar.terminals());
        }
        for rule in grammar.rules() {
            if let Some(idx) = grammar.index_of_rule(rule) {
                println!("{idx:>4} {rule}");
            }
        }
        println!("{}", automaton.table().to_markdown());
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        let input: Vec<Terminal> = line.split_whitespace().map(Terminal::from).collect();
        if input.is_empty() {
            continue;
        }
        let trace = match automaton.run(&input) {
            Ok(trace) => trace,
            Err(e) => {
                warn!("{line}: {e}");
                println!("{line}: {e}");
                continue;
            }
        };
        println!("{trace}");
        if trace.is_accepted() {
            println!("accepted");
            let derivation = Derivation::from_trace(&trace)?;
            if !derivation.is_empty() {
                println!("{derivation}");
            }
        } else {
            println!("rejected");
        }
        println!();
    }
    Ok(())
}
