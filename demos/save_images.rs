use topcodes::Scanner;

fn main() {
    env_logger::init();

    let mut scanner = Scanner::new();
    let codes = scanner
        .scan_by_filename("assets/photo.png")
        .expect("failed to open or decode assets/photo.png");

    println!("Found {} TopCodes.", codes.len());

    let preview = scanner
        .get_preview()
        .expect("a scan was just performed")
        .clone();
    preview
        .into_image()
        .save("target/thresholded.png")
        .expect("failed to save thresholding preview");
}
