use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use catalog_media::application::{
    ImageDisplayService, PendingImageStore, Prefetcher, UploadCompressor,
    UploadRecordImageUseCase,
};
use catalog_media::domain::entities::{ProductRecord, RecordId};
use catalog_media::domain::ports::CatalogApiPort;
use catalog_media::domain::services::MediaUrlBuilder;
use catalog_media::infrastructure::{
    AppConfig, CliArgs, Command, DiskImageCache, HttpImageFetcher, ImageFetcherConfig,
    LocalImageProcessor, RestCatalogClient, StorageManager, records_from_json,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = match args.config.as_deref().and_then(Path::parent) {
        Some(dir) if !dir.as_os_str().is_empty() => StorageManager::with_dir(dir.to_path_buf()),
        _ => StorageManager::new()?,
    };
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

struct Services {
    display: ImageDisplayService,
    prefetcher: Prefetcher,
    compressor: Arc<UploadCompressor>,
    api: Arc<dyn CatalogApiPort>,
    uploads: UploadRecordImageUseCase,
}

async fn create_services(config: &AppConfig) -> Result<Services> {
    let pending = Arc::new(PendingImageStore::new());
    let display = ImageDisplayService::new(
        MediaUrlBuilder::from_api_base(&config.api_base_url),
        Arc::clone(&pending),
    );

    let images = &config.images;
    let disk_cache = Arc::new(
        DiskImageCache::open(config.effective_cache_dir(), images.disk_cache_size)
            .await
            .wrap_err("failed to open image cache")?,
    );
    let fetcher = HttpImageFetcher::new(
        ImageFetcherConfig {
            max_concurrent_downloads: images.max_concurrent_downloads,
            timeout_secs: images.timeout_secs,
        },
        disk_cache,
    )?;
    let prefetcher = Prefetcher::new(display.clone(), Arc::new(fetcher), images.prefetch_limit);

    let processor = Arc::new(LocalImageProcessor::new(config.effective_upload_dir()));
    let compressor = Arc::new(UploadCompressor::new(processor, images.compression()));

    let api: Arc<dyn CatalogApiPort> = Arc::new(RestCatalogClient::new(
        config.api_base_url.clone(),
        config.api_token.clone(),
        images.timeout_secs,
    )?);
    let uploads = UploadRecordImageUseCase::new(
        Arc::clone(&api),
        Arc::clone(&compressor),
        pending,
    );

    Ok(Services {
        display,
        prefetcher,
        compressor,
        api,
        uploads,
    })
}

fn print_records(display: &ImageDisplayService, records: &[ProductRecord]) {
    for record in records {
        let id = record
            .record_id()
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let name = record.name.as_deref().unwrap_or("");
        println!("{id}\t{name}\t{}", display.display_image(record));
    }
}

async fn run(command: Command, services: Services) -> Result<()> {
    match command {
        Command::Resolve { file } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .wrap_err_with(|| format!("failed to read {}", file.display()))?;
            let body = serde_json::from_str(&content)?;
            let records = records_from_json(body)?;
            debug!(count = records.len(), "Resolving records from file");
            print_records(&services.display, &records);
        }
        Command::List { collection } => {
            let records = services.api.list_records(&collection).await?;
            print_records(&services.display, &records);
            services.prefetcher.prefetch_now(&records).await;
        }
        Command::Show { collection, id } => {
            let record = services.api.get_record(&collection, RecordId::new(id)).await?;
            print_records(&services.display, std::slice::from_ref(&record));
        }
        Command::Compress { files } => {
            for (source, output) in files.iter().zip(services.compressor.compress_batch(&files).await) {
                println!("{source}\t{output}");
            }
        }
        Command::Upload {
            collection,
            id,
            file,
        } => {
            let record = services
                .uploads
                .execute(&collection, RecordId::new(id), &file)
                .await?;
            print_records(&services.display, std::slice::from_ref(&record));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = catalog_media::VERSION, api = %config.api_base_url, "Starting catalog-media");

    let services = create_services(&config).await?;
    run(args.command, services).await
}
