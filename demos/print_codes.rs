use topcodes::Scanner;

fn main() {
    env_logger::init();

    let mut scanner = Scanner::new();
    let codes = scanner
        .scan_by_filename("assets/photo.png")
        .expect("failed to open or decode assets/photo.png");

    println!("Found {} TopCodes:", codes.len());
    for code in &codes {
        println!(
            "  code={:?} x={:.1} y={:.1} unit={:.2} orientation={:.3}",
            code.code(),
            code.x(),
            code.y(),
            code.unit(),
            code.orientation()
        );
    }
}
