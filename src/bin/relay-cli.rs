use clap::{Parser, Subcommand};
use url::Url;

use form_relay::form::{validate_email, Destination, FormClient, FormController, FormKind};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Send website form submissions from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a form the way the website does
    Submit {
        /// Form type tag (bedrift, courier, sjafor)
        #[arg(short, long)]
        form_type: String,

        /// Field as name=value; repeat for each field
        #[arg(short = 'F', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Page path the form is sent from
        #[arg(short, long, default_value = "/")]
        page: String,

        /// Relay endpoint
        #[arg(short, long, default_value = "http://localhost:8080/api/submit")]
        endpoint: Url,

        /// Origin header presented to the relay
        #[arg(short, long, default_value = "http://localhost")]
        origin: String,

        /// Send straight to the hosted form relay for this address instead
        #[arg(long, conflicts_with_all = ["endpoint", "origin"])]
        relay_email: Option<String>,
    },
    /// Show the subject line a form type produces
    Subject {
        form_type: String,
    },
    /// Check an email address the way the form does
    CheckEmail {
        email: String,
    },
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected name=value, got '{s}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Submit {
            form_type,
            fields,
            page,
            endpoint,
            origin,
            relay_email,
        } => {
            let destination = match relay_email {
                Some(email) => Destination::form_relay(email)?,
                None => Destination::Proxy { endpoint, origin },
            };
            let client = FormClient::new(destination)?;

            let mut form = FormController::new(form_type, page);
            for (name, value) in fields {
                form.set_field(name, value);
            }

            let result = form.submit(&client).await;
            if let Some(message) = form.message() {
                if message.success {
                    println!("{}", message.text);
                } else {
                    eprintln!("{}", message.text);
                }
            }

            match result {
                Ok(outcome) if outcome.is_success() => {}
                _ => std::process::exit(1),
            }
        }
        Commands::Subject { form_type } => {
            println!("{}", FormKind::from_tag(&form_type).subject());
        }
        Commands::CheckEmail { email } => {
            if validate_email(&email) {
                println!("valid");
            } else {
                eprintln!("invalid");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
