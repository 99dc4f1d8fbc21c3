//! Application wiring and command handlers

use anyhow::{Context, Result, bail};
use api::CapsuleClient;
use auth::{
    Access, IdentityProvider, Route, SessionBridge, SessionContext, TokenFileProvider,
    check_access,
};
use common::{AppConfig, FileStore};
use media::{PathPicker, PhotoPicker, UploadController, read_batch, validate_photo};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::Commands;

const TOKEN_FILE_NAME: &str = "id_token";

/// Everything a command needs, built once at startup
pub struct App {
    config: AppConfig,
    identity: Arc<TokenFileProvider>,
    api: Arc<CapsuleClient>,
    context: Arc<SessionContext>,
    bridge: SessionBridge,
}

impl App {
    /// Open the session store, restore the session and the identity user
    pub async fn bootstrap(config: AppConfig) -> Result<Self> {
        let store = FileStore::new(&config.store_path).context("Failed to open session store")?;
        let context = Arc::new(
            SessionContext::restore(Arc::new(store))
                .await
                .context("Failed to restore session")?,
        );

        let token_file = config
            .token_file
            .clone()
            .unwrap_or_else(|| config.store_path.with_file_name(TOKEN_FILE_NAME));
        let identity = Arc::new(TokenFileProvider::restore(token_file, config.email.clone()).await);
        context.on_auth_state_changed(identity.current_user()).await;

        let api = Arc::new(CapsuleClient::new(&config.api_url, &config.api_version));
        let bridge = SessionBridge::new(identity.clone(), api.clone(), context.clone());

        info!(phase = %context.phase().await, "Capsule client ready");
        Ok(Self {
            config,
            identity,
            api,
            context,
            bridge,
        })
    }

    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Login { email, password } => self.login(email, &password).await,
            Commands::Logout => self.logout().await,
            Commands::Trips => self.trips().await,
            Commands::Trip { id } => self.trip(&id).await,
            Commands::Upload {
                collection,
                files,
                caption,
                only_you_can_view,
                only_you_can_share,
            } => {
                self.upload(
                    collection,
                    files,
                    caption,
                    only_you_can_view,
                    only_you_can_share,
                )
                .await
            }
            Commands::Check { files } => self.check(&files).await,
            Commands::Invitation { collection } => self.invitation(&collection).await,
        }
    }

    async fn require(&self, route: Route) -> Result<()> {
        match check_access(&self.context, &route).await {
            Access::Allow => Ok(()),
            Access::Redirect(to) => {
                bail!(
                    "{} requires a signed-in session; run `capsule login` first ({})",
                    route,
                    to
                )
            }
        }
    }

    async fn login(&self, email: Option<String>, password: &str) -> Result<()> {
        let email = email
            .or_else(|| self.config.email.clone())
            .context("No email given; pass --email or set CAPSULE_EMAIL")?;

        let outcome = self.bridge.sign_in(&email, password).await?;
        if let Some(warning) = &outcome.warning {
            warn!("Signed in with warnings: {}", warning);
            println!("Warning: {}", warning);
        }
        println!(
            "Signed in as {}{}",
            email,
            outcome
                .backend_user_id
                .as_deref()
                .map(|id| format!(" (user {})", id))
                .unwrap_or_default()
        );
        println!("Next: {}", outcome.navigation.route);
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        let navigation = self.bridge.sign_out().await?;
        println!("Signed out. Next: {}", navigation.route);
        Ok(())
    }

    async fn trips(&self) -> Result<()> {
        self.require(Route::Trips).await?;

        let trips = self.bridge.trips().await?;
        if trips.collections.is_empty() {
            println!("No trips yet");
            return Ok(());
        }

        for trip in trips.newest_first() {
            println!(
                "{}  {:<10}  {}  ({} photos)",
                trip.id,
                trip.trip.trip_date,
                trip.collection_name,
                trip.photos_amount
            );
        }
        Ok(())
    }

    async fn trip(&self, id: &str) -> Result<()> {
        self.require(Route::Trip { id: id.to_string() }).await?;

        let detail = self.bridge.trip(id).await?;
        let collection = detail.collection;
        let trip = &collection.trip;

        println!("{}", collection.collection_name);
        println!("Date: {} {}", trip.trip_date, trip.trip_time);
        if !trip.trip_boat.is_empty() {
            println!("Boat: {}", trip.trip_boat);
        }
        if let Some(guide) = &trip.trip_guide {
            println!("Guide: {} {}", guide.name, guide.last_name);
        }
        println!("Weather: {} / wind {} / {}", trip.temp, trip.wind, trip.bright);
        for sighting in &trip.sightings {
            println!("  sighting: {}", sighting.specie_name);
        }
        println!("Photos: {}", collection.photos_amount);
        for photo in &collection.photos {
            println!("  {}  {}", photo.id, photo.name);
        }
        Ok(())
    }

    async fn upload(
        &self,
        collection: String,
        files: Vec<PathBuf>,
        caption: Option<String>,
        only_you_can_view: bool,
        only_you_can_share: bool,
    ) -> Result<()> {
        self.require(Route::Upload {
            collection_id: collection.clone(),
        })
        .await?;

        let picker = self.picker(files)?;
        let mut controller = UploadController::new(self.api.clone(), self.identity.clone(), picker)
            .with_max_size_mb(self.config.max_photo_size_mb);
        controller.set_collection(collection);

        let added = controller.pick_from_library(true).await?;
        if added == 0 {
            println!("No photos selected");
            return Ok(());
        }

        if let Some(caption) = caption {
            controller.set_caption(caption);
        }
        controller.set_only_you_can_view(only_you_can_view);
        controller.set_only_you_can_share(only_you_can_share);

        let navigation = controller.submit().await?;
        println!("Uploaded {} photo(s). Next: {}", added, navigation.route);
        Ok(())
    }

    #[cfg(feature = "native-picker")]
    fn picker(&self, files: Vec<PathBuf>) -> Result<Arc<dyn PhotoPicker>> {
        if files.is_empty() {
            return Ok(Arc::new(media::NativePicker));
        }
        Ok(Arc::new(PathPicker::new(files)))
    }

    #[cfg(not(feature = "native-picker"))]
    fn picker(&self, files: Vec<PathBuf>) -> Result<Arc<dyn PhotoPicker>> {
        if files.is_empty() {
            bail!("No photo files given");
        }
        Ok(Arc::new(PathPicker::new(files)))
    }

    async fn check(&self, files: &[PathBuf]) -> Result<()> {
        let photos = read_batch(files).await?;
        let mut rejected = 0;

        for photo in &photos {
            match validate_photo(photo, self.config.max_photo_size_mb) {
                Ok(()) => println!("ok      {}", photo.filename()),
                Err(e) => {
                    rejected += 1;
                    println!("reject  {}: {}", e.filename, e.reason);
                }
            }
        }

        if rejected > 0 {
            bail!("{} of {} photo(s) rejected", rejected, photos.len());
        }
        Ok(())
    }

    async fn invitation(&self, collection: &str) -> Result<()> {
        let response = self.bridge.validate_invitation(collection).await?;
        match response.valid {
            Some(false) => println!(
                "Invitation to {} is not valid{}",
                collection,
                response
                    .message
                    .map(|m| format!(": {}", m))
                    .unwrap_or_default()
            ),
            _ => println!("Invitation to {} is valid", collection),
        }
        Ok(())
    }
}
