use clap::Parser;
use reqwest::Method;

#[derive(Parser)]
#[command(name = "probe")]
#[command(about = "Send one request to a hello-router server and print the response", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    url: String,

    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request body.
    #[arg(short, long)]
    data: Option<String>,

    /// Path (and optional query string) to request.
    #[arg(default_value = "/")]
    path: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let method = Method::from_bytes(cli.method.as_bytes())?;
    let url = format!("{}{}", cli.url.trim_end_matches('/'), cli.path);

    let mut request = client.request(method, url);
    if let Some(data) = cli.data {
        request = request.body(data);
    }

    let res = request.send().await?;

    println!("{:?} {}", res.version(), res.status());
    for (name, value) in res.headers() {
        println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
    }
    println!();
    println!("{}", res.text().await?);

    Ok(())
}
