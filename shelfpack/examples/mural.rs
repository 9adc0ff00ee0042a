use shelfpack::{optimise, Rectangle, SheetSize};

fn main() {
    env_logger::init();

    let inputs: Vec<_> = (0..5)
        .map(|index| Rectangle::new(format!("panel-{}", index), (180.0, 240.0)))
        .chain(std::iter::once(Rectangle::new("banner", (400.0, 90.0))))
        .collect();

    let result = optimise(&inputs, SheetSize::A4);

    println!("Optimise result: {:#?}", result);
}
