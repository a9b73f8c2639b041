use std::path::Path;
use std::str::FromStr;

pub fn path(rawpath: &str) -> Result<(), String> {
    let path = Path::new(&rawpath);
    if !path.exists() {
        return Err(format!("{} file doesn't exist or there is no permission to read it", rawpath));
    } else {
        Ok(())
    }
}

pub fn writable(_rawpath: &str) -> Result<(), String> {
    // No portable way to check writability ahead of File::create
    Ok(())
}

pub fn region(raw: &str) -> Result<(), String> {
    let (start, end) = match raw.split_once('-') {
        Some(x) => x,
        None => return Err(format!("Region must be formatted as start-end, got {}", raw)),
    };
    let start: u64 = start.parse().map_err(|_| format!("failed to parse {}", start))?;
    let end: u64 = end.parse().map_err(|_| format!("failed to parse {}", end))?;
    if start >= end {
        return Err(format!("Region start must be below its end, got {}-{}", start, end));
    }
    Ok(())
}

pub fn numeric<T>(low: T, upper: T) -> impl Fn(&str) -> Result<(), String>
where
    T: FromStr + std::fmt::Display + std::cmp::PartialOrd + Sized,
    <T as FromStr>::Err: std::fmt::Debug,
{
    move |val: &str| -> Result<(), String> {
        let numeric = match val.parse::<T>() {
            Ok(x) => x,
            Err(_) => return Err(format!("failed to parse {}", val)),
        };

        if numeric < low || numeric > upper {
            return Err(format!("Value {} is expected to be inside [{}, {}] range", val, low, upper));
        }
        Ok(())
    }
}
