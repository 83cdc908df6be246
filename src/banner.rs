// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
  ____                 _ _     _____      _                  _
 |  _ \ ___  ___ _   _| | |_  | ____|_  _| |_ _ __ __ _  ___| |_ ___  _ __
 | |_) / _ \/ __| | | | | __| |  _| \ \/ / __| '__/ _` |/ __| __/ _ \| '__|
 |  _ <  __/\__ \ |_| | | |_  | |___ >  <| |_| | | (_| | (__| || (_) | |
 |_| \_\___||___/\__,_|_|\__| |_____/_/\_\\__|_|  \__,_|\___|\__\___/|_|

    Engineering Result Extractor · CGPA reports for a roll-number range
"#;
    println!("{}", banner);
}
