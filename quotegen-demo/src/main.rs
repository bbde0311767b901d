use quotegen_core::corpus::MemoryStore;
use quotegen_core::model::builder::{self, DEFAULT_ORDER};
use quotegen_core::model::compiled::CompiledModel;
use quotegen_core::model::pos::RuleTagger;
use quotegen_core::model::sampler;
use quotegen_core::service::{DEFAULT_MAX_CHARACTERS, QuoteService};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log cache decisions and build events (RUST_LOG=debug for more detail)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut rng = rand::rng();

    // A small quote store with two characters
    let mut store = MemoryStore::new();
    store.add_quote("captain", "The stars looked cold tonight.");
    store.add_quote("captain", "The stars guided us home.");
    store.add_quote("captain", "We sailed past the last beacon.");
    store.add_quote("captain", "Nobody sailed further than us.");
    store.add_quote("robot", "Beep.");

    // The service makes the cache-or-build decision: the first request
    // compiles a model from the corpus and stores its blob, later requests
    // reuse the cached blob.
    let mut service = QuoteService::new(store);

    for i in 0..5 {
        match service.generate_sentence("captain", DEFAULT_MAX_CHARACTERS, &mut rng)? {
            Some(sentence) => println!("Generated sentence {}: {}", i + 1, sentence),
            None => println!("Generated sentence {}: <no sentence available>", i + 1),
        }
    }

    // A single-quote character never reaches the model floor
    match service.generate_sentence("robot", DEFAULT_MAX_CHARACTERS, &mut rng)? {
        Some(sentence) => println!("Robot said: {sentence}"),
        None => println!("Robot has too few quotes for a model"),
    }

    // Random quote picks are biased toward the least-served quotes
    for _ in 0..3 {
        if let Some(quote) = service.random_quote("captain", &mut rng) {
            println!("Random quote: {quote}");
        }
    }
    let stats = service.stats("captain");
    println!(
        "Captain usage: {} of {} quotes served, {} sentences generated",
        stats.quotes_requested,
        service.store().quote_count("captain"),
        stats.sentences_generated
    );

    // The engine can also be driven directly, without the service layer
    let corpus = ["The cat sat.", "The cat ran."];
    let model = builder::build(&corpus, DEFAULT_ORDER, &RuleTagger)?;

    // The blob is a plain JSON document, reproducible for identical models
    let json = model.to_json();
    println!("Stored blob: {json}");
    let restored = CompiledModel::from_json(&json)?;
    assert_eq!(restored, model);

    // And a compact binary snapshot for local caching
    let bytes = model.to_bytes()?;
    println!("Snapshot size: {} bytes", bytes.len());

    if let Some(sentence) = sampler::sample(&restored, 80, &mut rng) {
        println!("Sampled from restored model: {sentence}");
    }

    Ok(())
}
