use std::env;

use ngram_hist_core::{BuildParams, Corpus, Strategy, build};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Usage: ngram-hist-exemple [corpus_dir] [strategy] [n] [workers]
    let args: Vec<String> = env::args().skip(1).collect();

    // Corpus folder, documents named 0.txt, 1.txt, ... for the indexed strategies
    let corpus = Corpus::new(args.first().map(String::as_str).unwrap_or("./Texts"));

    // 'sequential', 'v1' (load all), 'v2' (inline) or 'v3' (per worker)
    let strategy: Strategy = args.get(1).map(|s| s.parse::<Strategy>()).transpose()?.unwrap_or(Strategy::Inline);

    // Bigrams by default, one pass over the corpus, one worker per CPU
    let ngram_size: usize = args.get(2).map(|s| s.parse::<usize>()).transpose()?.unwrap_or(2);
    let workers: usize = match args.get(3) {
        Some(s) => s.parse()?,
        None => num_cpus::get(),
    };
    let params = BuildParams::new(ngram_size, 1, workers);

    let output = build(strategy, &corpus, &params)?;
    let histograms = &output.histograms;

    // Documents that could not be read are skipped, not fatal
    for path in &output.unreadable {
        println!("Skipped {}", path.display());
    }

    println!(
        "{} with {} workers: {} letter n-grams ({} distinct), {} word n-grams ({} distinct)",
        strategy,
        workers,
        histograms.letters.total(),
        histograms.letters.distinct(),
        histograms.words.total(),
        histograms.words.distinct()
    );

    // The ten most frequent n-grams of each kind
    println!("Top letters:");
    for (key, count) in histograms.letters.most_common(10) {
        println!("  {:>10} {}", count, key);
    }
    println!("Top words:");
    for (key, count) in histograms.words.most_common(10) {
        println!("  {:>10} {}", count, key);
    }

    Ok(())
}
