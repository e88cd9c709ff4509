use harstress::error::AppResult;

fn main() -> AppResult<()> {
    harstress::entry::run()
}
