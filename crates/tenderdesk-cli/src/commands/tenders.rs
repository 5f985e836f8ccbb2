use anyhow::Result;

use tenderdesk_backend::DistinctColumn;
use tenderdesk_core::DateRange;
use tenderdesk_core::time::parse_rfc3339;
use tenderdesk_portal::PortalSession;

use crate::cli::{OptionsArgs, OutputFormat, TendersArgs};
use crate::output;

pub async fn list(session: &PortalSession, args: &TendersArgs, format: OutputFormat) -> Result<()> {
    let mut query = session.tender_query()?.with_page(args.page);
    if let Some(ministry) = &args.ministry {
        query = query.with_ministry(ministry);
    }
    if let Some(department) = &args.department {
        query = query.with_department(department);
    }
    if let Some(city) = &args.city {
        query = query.with_city(city);
    }
    if let Some(search) = &args.search {
        query = query.with_search(search);
    }
    let mut dates = DateRange::new();
    if let Some(from) = &args.from {
        dates = dates.from(parse_rfc3339(from)?);
    }
    if let Some(to) = &args.to {
        dates = dates.to(parse_rfc3339(to)?);
    }
    query = query.with_dates(dates).with_keywords(args.keywords);

    let page = session.feed().fetch_page(&query).await?;
    output::print_tenders(&page, session.feed().config().page_size, format);
    Ok(())
}

pub async fn options(
    session: &PortalSession,
    args: &OptionsArgs,
    format: OutputFormat,
) -> Result<()> {
    let column: DistinctColumn = args.column.parse()?;
    let values = session.feed().filter_options(column).await?;
    output::print_string_list(&values, format);
    Ok(())
}
