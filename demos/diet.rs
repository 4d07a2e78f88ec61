use interval_trees::AvlDiet;

fn main() {
    let mut set = AvlDiet::new();

    for &(low, high) in &[(24, 26), (10, 11), (4, 5), (1, 2), (13, 15)] {
        set.insert((low, high), |a, b| println!("newly covered [{}, {}]", a, b))
            .expect("insert should work");
    }

    println!("Stored intervals: {:?}", set);

    println!("Bridging insert (2, 26):");
    set.insert((2, 26), |a, b| println!("newly covered [{}, {}]", a, b))
        .expect("insert should work");

    println!("Stored intervals: {:?}", set);
    println!("Contains 3: {}", set.contains(3));
    println!("Span: {:?}", set.span());
}
