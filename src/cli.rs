use crate::api::HttpDeliveryApi;
use crate::config::Config;
use crate::identity::{FileSessionStore, SessionStore};
use crate::render;
use crate::session::{dollars_to_cents, OrderSession};
use crate::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

/// dinebot - food-ordering recommendation client
#[derive(Parser, Debug)]
#[command(name = "dinebot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Save dining preferences and get a recommended order", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and display the current preferences
    Show,

    /// Update preferences; omitted fields keep their saved values
    Set {
        /// Preferred cuisine (thai, indian, mexican…)
        #[arg(long = "cuisine")]
        cuisine: Option<String>,

        /// Maximum delivery ETA in minutes
        #[arg(long = "max-eta")]
        max_eta: Option<u32>,

        /// Budget ceiling in whole dollars
        #[arg(long = "budget")]
        budget_dollars: Option<i64>,
    },

    /// Request a recommended order
    Recommend {
        /// Use the minimal unauthenticated endpoint
        #[arg(long = "raw")]
        raw: bool,
    },

    /// Print this device's identity
    Whoami,
}

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let store: Arc<dyn SessionStore> =
        Arc::new(FileSessionStore::new(&config.client.identity_path));
    let api = Arc::new(HttpDeliveryApi::new(&config.api.base_url));
    let session = OrderSession::new(api, Arc::clone(&store), &config.api.base_url);

    match cli.command {
        Commands::Whoami => {
            println!("{}", store.device_id().await?);
            Ok(())
        }
        Commands::Show => {
            session.bootstrap().await?;
            print_form(&store, &session).await
        }
        Commands::Set {
            cuisine,
            max_eta,
            budget_dollars,
        } => {
            session.bootstrap().await?;

            let mut prefs = session.state().preferences;
            if let Some(cuisine) = cuisine {
                prefs.cuisine = cuisine;
            }
            if let Some(max_eta) = max_eta {
                prefs.max_eta_minutes = max_eta;
            }
            if let Some(dollars) = budget_dollars {
                prefs.budget_max_cents = dollars_to_cents(dollars);
            }

            info!("Saving preferences: {:?}", prefs);
            session.save(prefs).await?;
            print_form(&store, &session).await
        }
        Commands::Recommend { raw } => {
            if raw {
                match session.recommend_raw().await {
                    Ok(payload) => print!("{}", render::render_payload(&payload)),
                    Err(e) => println!("Error: {}", e.display_message()),
                }
                return Ok(());
            }

            session.bootstrap().await?;
            session.recommend().await?;

            let state = session.state();
            if let Some(err) = &state.error {
                println!("Error: {err}");
            }
            if let Some(reco) = &state.recommendation {
                print!("{}", render::render_recommendation(reco));
            }
            Ok(())
        }
    }
}

async fn print_form(store: &Arc<dyn SessionStore>, session: &OrderSession) -> Result<()> {
    let device_id = store.device_id().await?;
    print!("{}", render::render_form(&device_id, &session.state()));
    Ok(())
}
