use std::fs::File;
use std::io::BufWriter;

/// Index of the largest value, the lowest index wins on ties.
pub fn argmax<'a, I: IntoIterator<Item = &'a f64>>(values: I) -> usize {
    let mut iter = values.into_iter();
    let mut max: f64 = match iter.next() {
        Some(v) => *v,
        None => return 0,
    };
    let mut result: usize = 0;
    for (i, v) in iter.enumerate() {
        if *v > max {
            max = *v;
            result = i + 1;
        }
    }
    result
}

pub fn moving_average(window: usize, vector: &[f64]) -> Vec<f64> {
    let window: usize = window.max(1);
    let mut aux: usize = 0;
    let mut result: Vec<f64> = vec![];
    while aux < vector.len() {
        let end: usize = (aux + window).min(vector.len());
        let slice: &[f64] = &vector[aux..end];
        let r: f64 = slice.iter().sum();
        result.push(r / slice.len() as f64);
        aux = end;
    }
    result
}

pub fn save_json(path: &str, data: serde_json::Value) -> std::io::Result<()> {
    let file: File = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &data)?;
    Ok(())
}
