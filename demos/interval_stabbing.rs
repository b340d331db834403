use ibs_tree::interval::Interval;
use ibs_tree::IbsTree;

fn main() {
    let tree = IbsTree::from_iter([
        Interval::closed(15, 20),
        Interval::closed(10, 30),
        Interval::closed(17, 19),
        Interval::closed_open(5, 20),
        Interval::closed(12, 15),
        Interval::open_closed(30, 40),
    ]);

    println!("Intervals in the collection:");
    for interval in tree.iter() {
        println!("{:?}", interval);
    }

    let point = 18;
    println!("Stabbing at {}:", point);
    for interval in tree.find_overlaps_at(&point) {
        println!("{:?}", interval);
    }

    let query = Interval::closed(6, 11);
    println!("Overlapping {:?}:", query);
    for interval in tree.find_overlaps(&query) {
        println!("{:?}", interval);
    }

    println!(
        "span = {:?}, maximum depth = {}",
        tree.span().expect("tree is occupied"),
        tree.maximum_depth()
    );
}
