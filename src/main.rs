use metrics_roundtrip::error::AppResult;

fn main() -> AppResult<()> {
    metrics_roundtrip::entry::run()
}
