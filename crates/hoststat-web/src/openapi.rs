//! OpenAPI documentation definition.

use hoststat_core::model::{CpuUsage, DiskSpace, MetricsSnapshot, OsStatistics, VolumeInfo};
use utoipa::OpenApi;

use crate::handlers::StatisticsResponse;

#[derive(OpenApi)]
#[openapi(
    paths(crate::handlers::handle_health, crate::handlers::handle_statistics,),
    components(schemas(
        StatisticsResponse,
        MetricsSnapshot,
        DiskSpace,
        OsStatistics,
        CpuUsage,
        VolumeInfo,
    )),
    info(
        title = "hoststat API",
        version = "1.0",
        description = "Point-in-time host metrics: disk capacity, memory, swap and CPU load"
    )
)]
pub(crate) struct ApiDoc;
