use editing::EditError;
use editing::run;

fn main() -> Result<(), EditError> {
    run(std::env::args().collect())
}
