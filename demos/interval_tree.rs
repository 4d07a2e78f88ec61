use interval_trees::{Interval, IntervalTree};
use std::iter::FromIterator;

fn main() {
    let tree = IntervalTree::from_iter([
        (15, 20),
        (10, 30),
        (17, 19),
        (5, 20),
        (12, 15),
        (30, 40),
    ]);

    println!("Inorder traversal of constructed interval tree:");
    for id in tree.iter_inorder() {
        println!("{:?}", tree.interval(id));
    }

    let x = Interval::new(6, 7);
    println!("Searching for interval {:?}.", x);
    if let Some(id) = tree.search(x) {
        println!("Overlaps with {:?}.", tree.interval(id));
    } else {
        println!("No overlapping interval.")
    }

    println!("All intervals overlapping [12, 16]:");
    for id in tree.find_all_overlapping((12, 16)) {
        println!("{:?}", tree.interval(id));
    }
}
