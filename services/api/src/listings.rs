use std::path::PathBuf;

use clap::Args;
use job_hunter::config::ListingsConfig;
use job_hunter::envelope::SuccessEnvelope;
use job_hunter::error::AppError;
use job_hunter::workflows::listings::{
    FileListingRepository, FilterQuery, ListingFilterEngine, ListingPage, ListingParams,
    ListingRepository,
};

/// Same parameters as `GET /jobs`, taken raw so the parsing rules match the HTTP path.
#[derive(Args, Debug, Default)]
pub(crate) struct JobsArgs {
    /// Dataset location (defaults to JOBS_DATA_PATH or outputs/master_jobs.json)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Case-insensitive keyword matched against title, description, and tags
    #[arg(long)]
    pub(crate) role: Option<String>,
    /// Keep only remote (`true`) or on-site (anything else) listings
    #[arg(long)]
    pub(crate) remote: Option<String>,
    /// Keep only listings tagged entry-level, junior, or fresher
    #[arg(long)]
    pub(crate) entry_level: Option<String>,
    /// Page size (default 50)
    #[arg(long)]
    pub(crate) limit: Option<String>,
    /// Listings to skip before the page starts (default 0)
    #[arg(long)]
    pub(crate) skip: Option<String>,
}

impl JobsArgs {
    fn params(&self) -> ListingParams {
        ListingParams {
            role: self.role.clone(),
            remote: self.remote.clone(),
            entry_level: self.entry_level.clone(),
            limit: self.limit.clone(),
            skip: self.skip.clone(),
        }
    }
}

pub(crate) async fn run_jobs_query(args: JobsArgs) -> Result<(), AppError> {
    let mut config = ListingsConfig::from_env()?;
    if let Some(path) = args.data.clone() {
        config.data_path = path;
    }

    let repository = FileListingRepository::new(&config);
    let query = FilterQuery::from_params(&args.params());
    let page = query_page(&repository, &query).await?;

    let envelope = SuccessEnvelope {
        success: true,
        data: page.listings,
        meta: Some(page.meta),
        filters: Some(query.echo()),
        message: None,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

pub(crate) async fn query_page<R>(
    repository: &R,
    query: &FilterQuery,
) -> Result<ListingPage, AppError>
where
    R: ListingRepository,
{
    let listings = repository.all().await?;
    Ok(ListingFilterEngine.apply(&listings, query))
}
