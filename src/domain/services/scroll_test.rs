use super::Scroll;

#[test]
fn it_stays_at_top_when_content_fits() {
    let mut scroll = Scroll::default();
    scroll.set_state(5, 10);
    scroll.down();
    scroll.down_page();
    assert_eq!(scroll.position, 0);
}

#[test]
fn it_clamps_to_last_page() {
    let mut scroll = Scroll::default();
    scroll.set_state(30, 10);
    scroll.down_page();
    assert_eq!(scroll.position, 10);
    scroll.down_page();
    assert_eq!(scroll.position, 20);
    scroll.down();
    assert_eq!(scroll.position, 20);

    scroll.up();
    assert_eq!(scroll.position, 19);
    scroll.up_page();
    assert_eq!(scroll.position, 9);
    scroll.reset();
    assert_eq!(scroll.position, 0);
}

#[test]
fn it_clamps_when_content_shrinks() {
    let mut scroll = Scroll::default();
    scroll.set_state(30, 10);
    scroll.down_page();
    scroll.down_page();
    scroll.set_state(12, 10);
    assert_eq!(scroll.position, 2);
}
