use sleep_physionet::{fetch_data, FetchOptions};

#[tokio::main]
async fn main() {
    env_logger::init();
    let subject: u16 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse().expect("subject must be an integer in 0..=82"))
        .unwrap_or(0);
    let paths = fetch_data(&[subject], &FetchOptions::default())
        .await
        .expect("fetching records failed");
    for (psg, hypnogram) in paths {
        println!("{}", psg.display());
        println!("{}", hypnogram.display());
    }
}
