use std::{fs::File, io::BufReader};

use anyhow::Context;
use pdf_script::{reader::StatementReader, statement::Statement};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => anyhow::bail!("usage: pdfs-dump <script>"),
    };

    let file = File::open(&path).with_context(|| format!("failed to open {}", path))?;

    let mut depth = 0;
    for statement in StatementReader::new(BufReader::new(file)) {
        let statement = statement.with_context(|| format!("failed to read {}", path))?;

        if statement == Statement::EndPage {
            depth = 0;
        }

        println!("{:indent$}{:?}", "", statement, indent = depth * 2);

        if let Statement::Page(..) = statement {
            depth = 1;
        }
    }

    Ok(())
}
