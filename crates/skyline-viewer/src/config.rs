use clap::Parser;
use listings::FilterForm;

#[derive(Parser, Debug, Clone)]
#[command(name = "skyline-viewer", about = "City skyline hero viewport with listing results")]
pub struct Config {
    /// Endpoint returning the listing units as a JSON array.
    #[arg(
        long,
        env = "SKYLINE_UNITS_URL",
        default_value = "http://127.0.0.1:3001/api/units"
    )]
    pub units_url: String,

    /// Search form: maximum price.
    #[arg(long, default_value = "")]
    pub max_price: String,

    /// Search form: minimum bedroom count.
    #[arg(long, default_value = "")]
    pub min_bedrooms: String,

    /// Search form: delivery date upper bound, YYYY-MM-DD.
    #[arg(long, default_value = "")]
    pub delivery_by: String,

    /// Search form: "lat,lng" or part of a unit name.
    #[arg(long, default_value = "")]
    pub area: String,
}

impl Config {
    /// The search form as a user would have typed it.
    pub fn filter_form(&self) -> FilterForm {
        FilterForm {
            max_price: self.max_price.clone(),
            min_bedrooms: self.min_bedrooms.clone(),
            delivery_by: self.delivery_by.clone(),
            area: self.area.clone(),
        }
    }
}
