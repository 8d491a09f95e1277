use std::error::Error;
use std::fs::File;
use std::io::Read;

use clap::ArgMatches;

/// The `<input>` argument, or the content of the file it names when `--file` is given
pub fn read_input(opts: &ArgMatches) -> Result<String, Box<dyn Error>> {
    let input = opts.value_of("input").ok_or("no input given")?;
    if !opts.is_present("file") {
        return Ok(input.to_owned());
    }

    let mut file = File::open(input)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}
