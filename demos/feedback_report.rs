//! Offline review report: CSV parsing and keyword sentiment.
//!
//! Run with: `cargo run --example feedback_report -- [reviews.csv]`

use iagen::feedback::{self, ReviewTable, Sentiment};

const SAMPLE: &str = "fecha;comentario;canal\n\
2024-05-01;Delicioso y crocante, me encanta;web\n\
2024-05-02;\"Llegó roto; pésimo empaque\";app\n\
2024-05-03;Normal, nada especial;web\n\
2024-05-04;Muy caro para el tamaño;tienda\n";

fn main() -> iagen::Result<()> {
    let table = match std::env::args().nth(1) {
        Some(path) => ReviewTable::from_path(path)?,
        None => ReviewTable::parse(SAMPLE)?,
    };
    let column = table.text_column().unwrap_or("comentario").to_string();
    let reviews = table.reviews(&column)?;

    let records = feedback::score(&reviews);
    for record in &records {
        println!("{:>8}  {}", record.sentiment.as_str(), record.text);
    }

    let count = |s: Sentiment| records.iter().filter(|r| r.sentiment == s).count();
    println!(
        "\n{}\n{} positive, {} negative, {} neutral",
        feedback::summarize(&reviews),
        count(Sentiment::Positive),
        count(Sentiment::Negative),
        count(Sentiment::Neutral)
    );

    Ok(())
}
