//! Long-form texts shown to the user at the decision points of an install.

pub fn welcome(product: &str) -> String {
    format!(
        r#"
Welcome to the {product} installer!

Before you start:

1. Connect your device to this computer with a USB cable.

2. Turn on USB debugging:

    1)  Open Settings and go to the System section
        (skip to step 5 if "Developer options" is already listed)
    2)  Open "About phone"
    3)  Tap "Build number" seven times until you are told
        that you are now a developer
    4)  Go back to the main Settings screen
    5)  Open "Developer options"
    6)  Turn on "USB debugging"
    7)  If the device asks whether to allow USB debugging for this
        computer's RSA key fingerprint, tap "OK"

WARNING: installing {product} erases all personal data on the device.
Back up anything you want to keep first!
"#
    )
}

pub const INCOMPLETE_INSTALL: &str = r#"
The installer seems to be missing some of its files.

Are you running it from outside the directory the installer archive was
extracted to?
"#;

pub const ADB_ISSUE: &str = r#"
There was a problem talking to your device.

Please check that:

1. The device is connected to this computer over USB
2. USB debugging is turned on (see the instructions above)
3. The device is unlocked, and you tapped "OK" on any prompt asking to
   allow USB debugging for this computer's RSA key fingerprint

On Windows, make sure the Google USB Driver is installed for your device
as described in HELP.txt. Most Windows problems come from a missing driver.

Run the installer again once you are ready.
"#;

pub const BOOTLOADER_NO_DEVICE: &str = r#"
Your device can't be found. Please check that it is connected to this
computer over USB.
"#;

pub const FIX_USB_PERMISSIONS: &str = r#"
This computer is missing permission to access your device over USB.

Linux
-----

Some distributions need an explicit udev rule for Android devices:

1. Unplug the device

2. Run this in a terminal (requires sudo):

   $ wget -S -O - https://source.android.com/source/51-android.txt | sed "s/<username>/$USER/" | sudo tee >/dev/null /etc/udev/rules.d/51-android.rules; sudo udevadm control --reload-rules

3. Plug the device back in and run the installer again

Windows
-------

Make sure the Google USB Driver is installed for your device as described
in HELP.txt. Most Windows problems come from a missing driver.
"#;

pub const UNLOCK_REBOOT_REQUIRED: &str = r#"
Bootloader unlocked!

Your device has to reboot before the install can continue. Unlocking
performs a factory reset, so this boot takes a few minutes longer than
usual.

Once the device has fully booted, turn USB debugging back on and run the
installer again.
"#;

pub fn install_complete(product: &str) -> String {
    format!(
        r#"
Installation complete!

The first boot takes 2-3 minutes while {product} sets up your device.
Please be patient.

Rebooting into {product}...
"#
    )
}

pub const MANUAL_REBOOT: &str =
    "\nPlease reboot your device manually by going to Reboot > System > Do Not Install";
