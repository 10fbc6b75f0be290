//! Listings: the results panel behind the skyline landing page.
//!
//! - [`record`]: unit records as returned by the CRM query, parsed leniently.
//! - [`filter`]: price / bedroom / delivery / area criteria (haversine radius
//!   or name substring), ANDed together.
//! - [`paging`]: page sizes per view mode and screen class.
//! - [`browser`]: the owned browser state and its operations.
//! - [`view`]: `render(state) -> ResultsView`, a declarative page description.
//! - [`transition`]: fade-out / swap / fade-in sequencing for the panel.

pub mod browser;
pub mod error;
pub mod filter;
pub mod geo;
pub mod paging;
pub mod record;
pub mod transition;
pub mod view;

pub use browser::{
    BrowserUpdate, BrowserViewState, ListingBrowser, LoadState, Notification, Refresh, ToastKind,
    UnitSource,
};
pub use error::{CriteriaError, FetchError};
pub use filter::{AreaQuery, FilterCriteria, FilterForm, AREA_RADIUS_KM};
pub use geo::{haversine_km, Coordinates, EARTH_RADIUS_KM};
pub use paging::{ScreenClass, ViewMode, MOBILE_BREAKPOINT_PX};
pub use record::{parse_records, ListingRecord, Location};
pub use transition::{ResultsPanel, FADE_DURATION};
pub use view::{
    render_page, Arrangement, Card, Layout, PageView, ResultsView, LOAD_FAILED_MESSAGE,
    NO_RESULTS_MESSAGE,
};
